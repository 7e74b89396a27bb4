//! Log output setup for hosts and the walker binary

/// Install an env_logger backend for the `log` facade.
///
/// Filters at `info` unless `RUST_LOG` says otherwise, e.g.
/// `RUST_LOG=tileworld::streaming=trace` to see every tile creation.
/// Does nothing if the host already installed a logger.
///
/// # Example
/// ```
/// tileworld::core::logging::init();
/// log::info!("Streaming started");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
