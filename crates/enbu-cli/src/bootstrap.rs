use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initializes the process-wide `tracing` subscriber. Default level is
/// `info`, raised to `debug` under `--verbose`; `RUST_LOG` always wins when
/// set.
pub(crate) fn init_tracing(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
