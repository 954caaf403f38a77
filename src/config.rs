use config::{Config, ConfigError, Environment, File, Value};
use serde::Deserialize;

/// Relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Spoonacular API key (can also be set via SPOONACULAR_API_KEY)
    pub api_key: Option<String>,
    /// Base URL of the upstream recipe API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number of recipes requested per ingredient search
    #[serde(default = "default_results")]
    pub results: u32,
    /// Upstream request timeout in seconds; unset means transport defaults
    pub timeout_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            base_url: default_base_url(),
            results: default_results(),
            timeout_secs: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_results() -> u32 {
    10
}

impl RelayConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with KOOKPAL__ prefix
    /// 2. kookpal.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: KOOKPAL__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Socket address string for the listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fill unset values from the conventional environment variables
    fn apply_env_fallbacks(
        mut self,
        api_key: Option<String>,
        port: Option<String>,
        port_configured: bool,
    ) -> Self {
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            self.api_key = api_key.filter(|k| !k.trim().is_empty());
        }

        if !port_configured {
            if let Some(port) = port.and_then(|p| p.parse().ok()) {
                self.port = port;
            }
        }

        self
    }
}

/// Load configuration from file and environment variables
///
/// After the layered sources, an unset API key falls back to
/// `SPOONACULAR_API_KEY` and `PORT` applies unless a port was configured.
pub fn load_config() -> Result<RelayConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("kookpal").required(false))
        .add_source(
            Environment::with_prefix("KOOKPAL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    from_settings(
        settings,
        std::env::var("SPOONACULAR_API_KEY").ok(),
        std::env::var("PORT").ok(),
    )
}

fn from_settings(
    settings: Config,
    api_key: Option<String>,
    port: Option<String>,
) -> Result<RelayConfig, ConfigError> {
    let port_configured = settings.get::<Value>("port").is_ok();
    let config: RelayConfig = settings.try_deserialize()?;

    Ok(config.apply_env_fallbacks(api_key, port, port_configured))
}
