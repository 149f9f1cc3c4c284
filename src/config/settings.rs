use serde::Deserialize;

/// Top-level configuration settings for the bridge.
///
/// Covers the subscriber-facing server and the upstream broker connection.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
}

/// Configuration for the WebSocket endpoint subscribers connect to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration for the upstream broker connection.
///
/// `endpoint` feeds the directory lookup; credentials and the client id
/// prefix are consumed only while wiring up the MQTT session.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id_prefix: String,
    pub keep_alive_secs: u64,
    pub first_connect_retries: u32,
    pub retry_initial_ms: u64,
    pub retry_max_ms: u64,
}

/// Partial configuration loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled
/// from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub upstream: Option<PartialUpstreamSettings>,
}

/// Partial server settings.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial upstream settings.
#[derive(Debug, Deserialize)]
pub struct PartialUpstreamSettings {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id_prefix: Option<String>,
    pub keep_alive_secs: Option<u64>,
    pub first_connect_retries: Option<u32>,
    pub retry_initial_ms: Option<u64>,
    pub retry_max_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            upstream: UpstreamSettings::default(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            client_id_prefix: "dronebridge".to_string(),
            keep_alive_secs: 10,
            first_connect_retries: 5,
            retry_initial_ms: 100,
            retry_max_ms: 30_000,
        }
    }
}
