use std::time::Duration;

use crate::{ConfigError, env_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on handling a single request, store round trips included.
    pub request_timeout: Duration,
    /// How often expired revocation entries are swept.
    pub revocation_sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout: Duration::from_secs(30),
            revocation_sweep_interval: Duration::from_secs(300),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let sweep_secs: u64 = env_or("REVOCATION_SWEEP_INTERVAL", 300)?;
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REVOCATION_SWEEP_INTERVAL",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            host: env_or("SERVER_HOST", defaults.host)?,
            port: env_or("SERVER_PORT", defaults.port)?,
            request_timeout: Duration::from_secs(env_or("REQUEST_TIMEOUT", 30)?),
            revocation_sweep_interval: Duration::from_secs(sweep_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
