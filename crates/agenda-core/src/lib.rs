pub mod config;
pub mod error;

pub use config::{CalendarConfig, Config, OAuthConfig, PathsConfig, ValidationResult};
pub use error::{AppError, AuthError, ConfigError, FetchError, ReqwestErrorExt};

/// Load `.env` and initialize logging.
///
/// Logs go to stderr so stdout only carries the event listing. `RUST_LOG`
/// wins over `verbose`.
pub fn init(verbose: bool) {
    let dotenv_path = dotenv::dotenv().ok();

    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {:?}", path);
    }
    tracing::debug!("agenda core initialized");
}
