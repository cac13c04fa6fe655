use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::errors::{Result, SchoolError};

/// school configuration, injected at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchoolConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub billing: BillingPolicy,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// connection settings for the relational store
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub use_tls: bool,
    /// server timezone passed to the driver
    pub timezone: String,
}

/// rules applied when recording payments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPolicy {
    pub reject_future_payment_dates: bool,
    pub require_payment_method: bool,
}

/// password policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
    pub min_password_length: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "dojo".to_string(),
            user: "dojo".to_string(),
            password: String::new(),
            use_tls: true,
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            reject_future_payment_dates: true,
            require_payment_method: true,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            min_password_length: 8,
        }
    }
}

// the password never reaches logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl DatabaseConfig {
    /// connection url without the password
    pub fn connection_url(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}?useSSL={}&serverTimezone={}",
            self.user, self.host, self.port, self.database, self.use_tls, self.timezone
        )
    }
}

impl SchoolConfig {
    /// local development setup: no tls, cheap hashing
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                use_tls: false,
                ..DatabaseConfig::default()
            },
            billing: BillingPolicy::default(),
            security: SecurityConfig {
                bcrypt_cost: 4,
                min_password_length: 8,
            },
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SchoolConfig =
            serde_json::from_str(json).map_err(|e| SchoolError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SchoolError::InvalidConfiguration {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(SchoolError::InvalidConfiguration {
                message: format!("bcrypt cost {} outside 4..=31", self.security.bcrypt_cost),
            });
        }

        if self.security.min_password_length < 8 {
            return Err(SchoolError::InvalidConfiguration {
                message: "minimum password length must be at least 8".to_string(),
            });
        }

        if self.database.host.trim().is_empty() {
            return Err(SchoolError::InvalidConfiguration {
                message: "database host is empty".to_string(),
            });
        }

        if self.database.database.trim().is_empty() {
            return Err(SchoolError::InvalidConfiguration {
                message: "database name is empty".to_string(),
            });
        }

        if self.database.port == 0 {
            return Err(SchoolError::InvalidConfiguration {
                message: "database port must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
