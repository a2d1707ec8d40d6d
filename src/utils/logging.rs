use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a level is supplied
pub const DEFAULT_FILTER: &str = "ytd=info";

/// Build the filter for `level`; `RUST_LOG` wins when set
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("ytd={level}")),
        None => EnvFilter::new(DEFAULT_FILTER),
    })
}

/// Install the global subscriber. Output goes to stderr so stdout stays
/// clean for listings. Repeated calls are ignored.
pub fn init_tracing(level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
