//! Per-session chat context.
//!
//! `ChatSession` carries every handle one conversational turn needs
//! (pipeline, rate limiter, translator, speech client, transcript), so
//! there is no ambient session state anywhere in the shell.

use std::path::Path;

use clap::ValueEnum;
use tracing::warn;

use kiosk_llm::{
    GenerationError, RateLimiter, ResponsePipeline, TranscribeError, Transcription, Translator,
    WebSpeechClient,
};
use kiosk_session::{Message, TranscriptManager};

/// Reply language for the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    English,
    Tamil,
}

impl Language {
    /// Code used by the translation endpoint, when translation applies.
    fn target_code(self) -> Option<&'static str> {
        match self {
            Language::English => None,
            Language::Tamil => Some("ta"),
        }
    }
}

/// One user's conversation context
pub struct ChatSession {
    pipeline: ResponsePipeline,
    limiter: RateLimiter,
    translator: Translator,
    speech: WebSpeechClient,
    transcript: TranscriptManager,
    language: Language,
}

impl ChatSession {
    pub fn new(
        pipeline: ResponsePipeline,
        limiter: RateLimiter,
        translator: Translator,
        speech: WebSpeechClient,
        transcript: TranscriptManager,
        language: Language,
    ) -> Self {
        Self {
            pipeline,
            limiter,
            translator,
            speech,
            transcript,
            language,
        }
    }

    pub fn session_id(&self) -> &str {
        self.transcript.session_id()
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Run one conversational turn: record the user message, wait out the
    /// rate limit, acquire a reply, translate when requested, record the
    /// reply.
    ///
    /// Log failures are warnings, not turn failures. The limiter timestamp
    /// is stamped only after a successful acquisition, matching the
    /// observed reference behavior.
    pub async fn submit(&mut self, input: &str) -> Result<String, GenerationError> {
        if let Err(err) = self.transcript.append_user(input).await {
            warn!(error = %err, "failed to log user message");
        }

        self.limiter.throttle().await;
        let reply = self.pipeline.get_response(input).await?;
        self.limiter.record();

        let reply = match self.language.target_code() {
            Some(code) => self.translator.translate_or_original(&reply, code).await,
            None => reply,
        };

        if let Err(err) = self.transcript.append_assistant(reply.clone()).await {
            warn!(error = %err, "failed to log assistant message");
        }

        Ok(reply)
    }

    /// Transcribe a WAV recording into candidate user input.
    pub async fn transcribe_file(&self, path: &Path) -> Result<Transcription, TranscribeError> {
        let bytes = tokio::fs::read(path).await?;
        self.speech.transcribe_wav(&bytes).await
    }
}
