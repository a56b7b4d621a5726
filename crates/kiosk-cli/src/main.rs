mod faq;
mod logging;
mod session;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use kiosk_config::{default_config_path, load_system_instruction, resolve_api_key, Config};
use kiosk_llm::{
    GeminiBackend, GoogleTranslate, RateLimiter, ResponsePipeline, Transcription, Translator,
    WebSpeechClient,
};
use kiosk_session::{Message, Role, SqliteStore, TranscriptManager, TranscriptStore};

use crate::session::{ChatSession, Language};

#[derive(Parser)]
#[command(name = "kiosk")]
#[command(about = "Campus admissions chat assistant")]
#[command(version)]
struct Cli {
    /// Session identifier; a fresh one is generated when omitted
    #[arg(long)]
    session_id: Option<String>,

    /// Transcript log path (overrides the configured location)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Reply language
    #[arg(long, value_enum, default_value = "english")]
    language: Language,

    /// Config file path
    #[arg(long, env = "KIOSK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat
    Chat,
    /// Send a single message and print the reply
    Send {
        /// Message content
        message: String,
    },
    /// Print the stored transcript for the session
    History,
    /// Show frequently asked questions and contact info
    Faq,
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long, default_value = "false")]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from("kiosk.json"));
    let config = Config::load(&config_path).await?;
    config.validate()?;

    let session_id = cli
        .session_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let db_path = cli.db.clone().unwrap_or_else(|| config.storage.db_path.clone());

    match cli.command {
        Commands::Faq => {
            faq::print_faqs();
            Ok(())
        }
        Commands::Config { ref command } => handle_config(command, &config, &config_path).await,
        Commands::History => show_history(&db_path, &session_id).await,
        Commands::Chat => {
            let mut session = build_session(&config, &db_path, &session_id, cli.language).await?;
            run_chat(&mut session).await
        }
        Commands::Send { ref message } => {
            let mut session = build_session(&config, &db_path, &session_id, cli.language).await?;
            take_turn(&mut session, message).await;
            Ok(())
        }
    }
}

async fn build_session(
    config: &Config,
    db_path: &Path,
    session_id: &str,
    language: Language,
) -> anyhow::Result<ChatSession> {
    let api_key = match resolve_api_key() {
        Ok(key) => key,
        Err(err) => {
            eprintln!("{}", format!("❌ {err}").red());
            std::process::exit(1);
        }
    };
    let instructions = match load_system_instruction(&config.instructions_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{}", format!("❌ {err}").red());
            std::process::exit(1);
        }
    };

    let timeout = Duration::from_secs(config.llm.request_timeout_secs);
    let primary = GeminiBackend::with_timeout(
        api_key.as_str(),
        config.llm.primary_model.as_str(),
        timeout,
    )?
    .with_system_instruction(instructions.as_str());
    let fallback = GeminiBackend::with_timeout(
        api_key.as_str(),
        config.llm.fallback_model.as_str(),
        timeout,
    )?
    .with_system_instruction(instructions.as_str());
    let pipeline = ResponsePipeline::new(Arc::new(primary), Arc::new(fallback));

    let limiter = RateLimiter::new(Duration::from_secs_f64(
        config.llm.min_request_interval_secs,
    ));
    let translator = Translator::new(Arc::new(GoogleTranslate::new()?));
    let speech = WebSpeechClient::new(api_key.as_str(), config.speech.language.as_str())?;

    let store: Arc<dyn TranscriptStore> = Arc::new(SqliteStore::open(db_path)?);
    let transcript = match TranscriptManager::load(Arc::clone(&store), session_id).await {
        Ok(transcript) => transcript,
        Err(err) => {
            tracing::warn!(error = %err, "could not read stored history, starting fresh");
            TranscriptManager::fresh(store, session_id)
        }
    };

    Ok(ChatSession::new(
        pipeline, limiter, translator, speech, transcript, language,
    ))
}

async fn run_chat(session: &mut ChatSession) -> anyhow::Result<()> {
    println!("{}", "🎓 I am your College Guide".cyan().bold());
    println!("{}", format!("Session ID: {}", session.session_id()).dimmed());
    println!(
        "{}",
        "Type 'exit' or 'quit' to leave, ':voice <file.wav>' to speak".dimmed()
    );
    println!();

    render_transcript(session.messages());

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("{}", "👋 Goodbye!".cyan());
            break;
        }
        if input.is_empty() {
            continue;
        }

        let input = if let Some(path) = input.strip_prefix(":voice ") {
            match session.transcribe_file(Path::new(path.trim())).await {
                Ok(Transcription::Text(text)) => {
                    println!("{}", format!("You said: {text}").dimmed());
                    text
                }
                Ok(Transcription::Unintelligible) => {
                    println!("{}", "Sorry, I could not understand the audio.".red());
                    continue;
                }
                Ok(Transcription::NoAudio) => {
                    println!("{}", "No audio detected.".red());
                    continue;
                }
                Err(err) => {
                    println!("{}", format!("Could not transcribe audio: {err}").red());
                    continue;
                }
            }
        } else {
            input.to_string()
        };

        take_turn(session, &input).await;
        println!();
    }

    Ok(())
}

async fn take_turn(session: &mut ChatSession, input: &str) {
    match session.submit(input).await {
        Ok(reply) => {
            println!("{} {}", "Assistant:".green().bold(), reply);
        }
        Err(err) => {
            println!("{}", format!("❌ An error occurred: {err}").red());
        }
    }
}

fn render_transcript(messages: &[Message]) {
    for message in messages {
        match message.role {
            Role::User => println!("{} {}", "You:".cyan().bold(), message.content),
            Role::Assistant => println!("{} {}", "Assistant:".green().bold(), message.content),
        }
    }
}

async fn show_history(db_path: &Path, session_id: &str) -> anyhow::Result<()> {
    let store = SqliteStore::open(db_path)?;
    let messages = store.load(session_id).await?;

    if messages.is_empty() {
        println!("{}", "No chat history yet.".dimmed());
        return Ok(());
    }

    for message in &messages {
        let stamp = message.created_at.format("%Y-%m-%d %H:%M:%S");
        let role = match message.role {
            Role::User => "User:".cyan().bold(),
            Role::Assistant => "Assistant:".green().bold(),
        };
        println!("{} {} {}", format!("[{stamp}]").dimmed(), role, message.content);
    }

    Ok(())
}

async fn handle_config(
    command: &ConfigCommands,
    config: &Config,
    path: &Path,
) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", "📋 Current Configuration:".cyan().bold());
            println!();
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                println!(
                    "{}",
                    format!("⚠️  Config already exists at {:?}", path).yellow()
                );
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }
            Config::default().save(path).await?;
            println!("{}", format!("✅ Config initialized at {:?}", path).green());
        }
    }
    Ok(())
}
