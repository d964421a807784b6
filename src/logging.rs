use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Logs go to stderr in compact form so stdout stays free for command
/// output. `RUST_LOG` takes precedence; otherwise the level is `info`, or
/// `debug` with `verbose`. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
