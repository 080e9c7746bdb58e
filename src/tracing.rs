use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` wins when set, otherwise the
/// library and the converter log at `default_level`.
pub fn try_init_tracing_subscriber(
    default_level: Level,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var(EnvFilter::DEFAULT_ENV)
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level)));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .finish();
    use tracing_subscriber::util::SubscriberInitExt;
    subscriber.try_init()?;
    Ok(())
}

fn default_directives(level: Level) -> String {
    format!(
        "{}={level},seg2su_convert={level}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
    )
}
