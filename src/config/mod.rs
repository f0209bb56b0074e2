//! Configuration module for the labweb service
//!
//! Loads and parses configuration from environment variables.


/// Default configuration values
pub mod defaults {
    pub const LISTEN_PORT: u16 = 8080;
    pub const ENVIRONMENT: &str = "dev";
    pub const REDIS_PORT: u16 = 6379;
    pub const REDIS_DB: u32 = 0;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const ENVIRONMENT: &str = "LAB_ENV";
    pub const REDIS_HOST: &str = "REDIS_HOST";
    pub const REDIS_PORT: &str = "REDIS_PORT";
    pub const REDIS_DB: &str = "REDIS_DB";
}

/// Connection parameters for the optional Redis store
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: u32,
}

impl RedisConfig {
    /// Address in `host:port` form for `TcpStream::connect`
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_port: u16,
    pub environment: String,
    /// `None` when no Redis host is configured; the store feature is then
    /// fully disabled and no network call is ever attempted.
    pub redis: Option<RedisConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_port: defaults::LISTEN_PORT,
            environment: defaults::ENVIRONMENT.to_string(),
            redis: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_port = std::env::var(env_vars::PORT)
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults::LISTEN_PORT);

        let environment = std::env::var(env_vars::ENVIRONMENT)
            .unwrap_or_else(|_| defaults::ENVIRONMENT.to_string());

        let redis = std::env::var(env_vars::REDIS_HOST)
            .ok()
            .filter(|h| !h.trim().is_empty())
            .map(|host| {
                let port = std::env::var(env_vars::REDIS_PORT)
                    .ok()
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or_else(|| {
                        tracing::warn!(
                            "Invalid or missing {}, using {}",
                            env_vars::REDIS_PORT,
                            defaults::REDIS_PORT
                        );
                        defaults::REDIS_PORT
                    });
                let db = std::env::var(env_vars::REDIS_DB)
                    .ok()
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(defaults::REDIS_DB);
                RedisConfig { host, port, db }
            });

        if redis.is_none() {
            tracing::warn!(
                "No {} configured. Service will run without the hit counter.",
                env_vars::REDIS_HOST
            );
        }

        Config {
            listen_port,
            environment,
            redis,
        }
    }
}
