mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{ServerSettings, Settings, UpstreamSettings};

/// Loads the configuration from the default file and environment variables.
///
/// Values found in either source override the built-in defaults; anything
/// not specified falls back to `Settings::default()`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        upstream: UpstreamSettings {
            endpoint: partial
                .upstream
                .as_ref()
                .and_then(|u| u.endpoint.clone())
                .or(default.upstream.endpoint),
            username: partial
                .upstream
                .as_ref()
                .and_then(|u| u.username.clone())
                .or(default.upstream.username),
            password: partial
                .upstream
                .as_ref()
                .and_then(|u| u.password.clone())
                .or(default.upstream.password),
            client_id_prefix: partial
                .upstream
                .as_ref()
                .and_then(|u| u.client_id_prefix.clone())
                .unwrap_or(default.upstream.client_id_prefix),
            keep_alive_secs: partial
                .upstream
                .as_ref()
                .and_then(|u| u.keep_alive_secs)
                .unwrap_or(default.upstream.keep_alive_secs),
            first_connect_retries: partial
                .upstream
                .as_ref()
                .and_then(|u| u.first_connect_retries)
                .unwrap_or(default.upstream.first_connect_retries),
            retry_initial_ms: partial
                .upstream
                .as_ref()
                .and_then(|u| u.retry_initial_ms)
                .unwrap_or(default.upstream.retry_initial_ms),
            retry_max_ms: partial
                .upstream
                .as_ref()
                .and_then(|u| u.retry_max_ms)
                .unwrap_or(default.upstream.retry_max_ms),
        },
    })
}
