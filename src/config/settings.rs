//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub chores: ChoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for paths no route matches
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Relational store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_database_url() -> String {
    "sqlite://household.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            sqlx_logging: false,
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    /// Adds the `Secure` attribute to the session cookie
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_name() -> String {
    "sid".to_string()
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_secs: default_session_ttl(),
            secure: false,
        }
    }
}

/// Password hashing cost parameters (argon2id)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_password_memory")]
    pub password_memory_kib: u32,
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    #[serde(default = "default_password_parallelism")]
    pub password_parallelism: u32,
}

fn default_password_memory() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}

fn default_password_parallelism() -> u32 {
    1
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_memory_kib: default_password_memory(),
            password_iterations: default_password_iterations(),
            password_parallelism: default_password_parallelism(),
        }
    }
}

/// Rate limiting for the login and signup routes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_true() -> bool {
    true
}

fn default_rps() -> u32 {
    5
}

fn default_burst() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

/// Asset host configuration for bill attachments
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub cloud_name: String,
    /// Unsigned upload preset configured on the asset host
    #[serde(default)]
    pub upload_preset: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default = "default_allowed_formats")]
    pub allowed_formats: Vec<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    #[serde(default = "default_upload_timeout")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_folder() -> String {
    "pad_notes".to_string()
}

fn default_allowed_formats() -> Vec<String> {
    vec!["jpg".to_string(), "png".to_string(), "pdf".to_string()]
}

fn default_max_file_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_upload_timeout() -> u64 {
    30000
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: default_api_base(),
            cloud_name: String::new(),
            upload_preset: String::new(),
            folder: default_folder(),
            allowed_formats: default_allowed_formats(),
            max_file_bytes: default_max_file_bytes(),
            timeout_ms: default_upload_timeout(),
        }
    }
}

impl UploadConfig {
    /// Upload endpoint for the configured cloud
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Chore recurrence configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChoreConfig {
    /// Interval of the scheduled rollover sweep; 0 disables it
    #[serde(default)]
    pub rollover_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/household.yaml")
    }

    /// Load settings from a specific configuration file (YAML or TOML)
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
        {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("database.url", default_database_url())?
            .set_default("session.cookie_name", default_cookie_name())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix("HOUSEHOLD")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("upload.allowed_formats")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.database.url.trim().is_empty() {
            return Err(invalid("Database url cannot be empty"));
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(invalid("Session cookie name cannot be empty"));
        }
        if self.session.ttl_secs == 0 {
            return Err(invalid("Session ttl must be positive"));
        }

        if self.rate_limit.enabled
            && (self.rate_limit.requests_per_second == 0 || self.rate_limit.burst_size == 0)
        {
            return Err(invalid("Rate limit values must be positive when enabled"));
        }

        if self.upload.enabled {
            if self.upload.cloud_name.is_empty() {
                return Err(invalid("Upload is enabled but upload.cloud_name is empty"));
            }
            if self.upload.upload_preset.is_empty() {
                return Err(invalid("Upload is enabled but upload.upload_preset is empty"));
            }
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
