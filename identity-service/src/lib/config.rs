use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for identity-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub email: EmailConfig,
    pub links: LinksConfig,
    pub notifiers: NotifiersConfig,
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub hashing: Option<HashingConfig>,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Kafka configuration.
///
/// `topic` carries outgoing user and clinic events; `clinic_events_topic` is
/// where the profile service announces clinics it created.
#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub clinic_events_topic: String,
    pub group_id: String,
}

/// Transactional email API.
#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_token: String,
    pub sender: String,
    pub product_name: String,
}

/// Base urls embedded in emailed links.
#[derive(Debug, Deserialize, Clone)]
pub struct LinksConfig {
    pub verify_base_url: String,
    pub reset_base_url: String,
}

/// Services called directly when the event broker is unavailable.
#[derive(Debug, Deserialize, Clone)]
pub struct NotifiersConfig {
    pub profile_service_url: String,
    pub appointments_service_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokensConfig {
    pub verification_ttl_minutes: i64,
    pub reset_ttl_minutes: i64,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            verification_ttl_minutes: 15,
            reset_ttl_minutes: 60,
        }
    }
}

/// Argon2id cost parameters. Library defaults apply when absent.
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Platform admin created at startup when both fields are set.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BootstrapConfig {
    pub sys_admin_email: Option<String>,
    pub sys_admin_password: Option<String>,
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Fails when a required key is missing or the signing secret is empty.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        if self.tokens.verification_ttl_minutes <= 0 || self.tokens.reset_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "token lifetimes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The bootstrap admin credentials, if both are configured.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (
            self.bootstrap.sys_admin_email.as_deref(),
            self.bootstrap.sys_admin_password.as_deref(),
        ) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}
