use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Compact stdout logging; `RUST_LOG` overrides the INFO default.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .with_env_filter(filter)
        .init();
}
