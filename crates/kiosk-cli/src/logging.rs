use tracing_subscriber::EnvFilter;

/// Initialize tracing for the shell. `KIOSK_LOG` overrides the filter;
/// the default keeps the chat output quiet.
pub fn init_tracing() {
    let filter = std::env::var("KIOSK_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn,kiosk_llm=info,kiosk_session=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}
