use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Settings for commands that never call the places provider, so no
/// provider credential is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseConfig {
    pub log_level: String,
    pub saved_api_url: String,
    pub settings_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Credential for the places, details and geocoding endpoints.
    pub places_api_key: String,
    pub places_base_url: String,
    pub saved_api_url: String,
    pub settings_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Delay between paginated follow-up requests. Never below 2000 ms.
    pub page_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub geolocation_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("saved_api_url", &self.saved_api_url)
            .field("settings_path", &self.settings_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("geolocation_timeout_secs", &self.geolocation_timeout_secs)
            .finish()
    }
}
