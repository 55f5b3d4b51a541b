use crate::{ConfigError, env_or};

/// Matches `bcrypt::DEFAULT_COST`.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Clone, Debug)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bcrypt_cost = env_or("BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }
        Ok(Self { bcrypt_cost })
    }
}
