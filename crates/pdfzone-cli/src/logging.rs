use tracing_subscriber::{fmt, EnvFilter};

/// Set up logging on stderr. `RUST_LOG` wins over the `-v` count; without
/// either only warnings are shown so progress output stays readable.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("logging initialized");
}
