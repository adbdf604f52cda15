use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber, writing to stderr so tables on stdout stay
/// clean. Without `--verbose` only warnings from this crate are shown, such as
/// missing quotes or a stale fund snapshot. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let crate_filter = Targets::new().with_target(env!("CARGO_CRATE_NAME"), level);
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(crate_filter)
        .with(env_filter)
        .init();
}
