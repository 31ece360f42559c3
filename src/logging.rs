use tracing_subscriber::EnvFilter;

/// logging 초기화 (RUST_LOG, 기본값 info)
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .with_target(false)
        .init();
}
