use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "laptop_rank=debug"
    } else {
        "warn"
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `--verbose`. Logs go to stderr so that TSV and
/// JSON on stdout stay machine-readable.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbose))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}
