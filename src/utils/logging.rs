use tracing_subscriber::EnvFilter;

fn filter() -> EnvFilter {
    let directives = std::env::var("STUDIO_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    EnvFilter::new(directives)
}

pub fn init() {
    let fmt = tracing_subscriber::fmt().with_env_filter(filter()).with_ansi(false);
    fmt.init();
}

/// Like [`init`] but tolerates a subscriber that is already installed.
pub fn try_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_test_writer()
        .try_init();
}
