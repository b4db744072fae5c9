use tracing_subscriber::EnvFilter;

/// Installs the global stderr subscriber.
///
/// The level comes from `--log-level`, then `LOG_LEVEL`, then `info`.
pub fn init(flag: Option<&str>) {
    let requested = flag
        .map(str::to_owned)
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| String::from("info"));
    let filter = EnvFilter::try_new(normalize_level(&requested))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Accepts conventional level names in any case, e.g. `WARNING` or `CRITICAL`.
fn normalize_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => String::from("warn"),
        "critical" | "fatal" => String::from("error"),
        "" => String::from("info"),
        other => other.to_owned(),
    }
}
