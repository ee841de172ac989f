use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber on stderr.
///
/// `verbosity` maps to warn / info / debug; `RUST_LOG` wins when set.
/// Calling this twice is harmless: the second install is ignored.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
