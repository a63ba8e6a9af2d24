use std::env;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins over the configured level. Safe to call more than once.
pub fn init_tracing(default_level: &str) {
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
