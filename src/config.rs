use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Persistence
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,

    // Server
    pub host: String,
    pub port: u16,
    pub cors_allow_any: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Persistence (in-memory when REDIS_URL is unset)
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            redis_key_prefix: env::var("REDIS_KEY_PREFIX")
                .unwrap_or_else(|_| "deployboard".to_string()),

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            cors_allow_any: env::var("CORS_ALLOW_ANY")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("CORS_ALLOW_ANY"))?,
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            redis_key_prefix: "deployboard".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_allow_any: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
