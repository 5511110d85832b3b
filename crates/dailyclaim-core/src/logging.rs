use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global `fmt` subscriber. `RUST_LOG` overrides the default
/// level; `verbose` raises the default from `info` to `debug`.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}
