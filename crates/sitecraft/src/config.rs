use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;
use url::Url;

use crate::locale::Locale;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub locale: Locale,
}

impl Config {
    /// Load configuration from a YAML file. A missing file yields defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }

    /// Overlay settings from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay settings from an arbitrary variable lookup.
    ///
    /// Recognized variables:
    /// - `TELEGRAM_TOKEN`: bot token
    /// - `PORT`: webhook listen port
    /// - `WEBHOOK_URL`: public webhook URL
    /// - `RENDER`: when set to a non-empty value, selects webhook delivery
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TELEGRAM_TOKEN").filter(|t| !t.is_empty()) {
            self.telegram.token = Some(token);
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(url) = lookup("WEBHOOK_URL").filter(|u| !u.is_empty()) {
            self.telegram.webhook_url = Some(url);
        }
        if lookup("RENDER").is_some_and(|v| !v.is_empty()) {
            self.telegram.delivery = DeliveryMode::Webhook;
        }
        Ok(())
    }

    /// The bot token, which must be present and non-empty.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.telegram
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Resolve how inbound updates reach the bot.
    pub fn delivery(&self) -> Result<Delivery, ConfigError> {
        match self.telegram.delivery {
            DeliveryMode::Polling => Ok(Delivery::Polling),
            DeliveryMode::Webhook => {
                let raw = self
                    .telegram
                    .webhook_url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .ok_or(ConfigError::MissingWebhookUrl)?;
                let url = Url::parse(raw).map_err(|e| ConfigError::InvalidWebhookUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Delivery::Webhook { url })
            }
        }
    }
}

// ============================================================================
// TelegramConfig
// ============================================================================

#[derive(Clone, Default, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub delivery: DeliveryMode,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("delivery", &self.delivery)
            .field("webhook_url", &self.webhook_url)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    #[default]
    Polling,
    Webhook,
}

/// Resolved update delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Polling,
    Webhook { url: Url },
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

// ============================================================================
// GeneratorConfig
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Prediction endpoint receiving `{"data": [prompt]}`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Public page users can visit directly when generation fails.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            site_url: default_site_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://enzostvs-deepsite.hf.space/api/predict".to_string()
}

fn default_site_url() -> String {
    "https://enzostvs-deepsite.hf.space/".to_string()
}

fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// ArtifactConfig
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Directory holding in-flight HTML files.
    #[serde(default = "default_artifact_dir")]
    pub dir: PathBuf,
    /// Attachment name shown to the user.
    #[serde(default = "default_artifact_file_name")]
    pub file_name: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            file_name: default_artifact_file_name(),
        }
    }
}

fn default_artifact_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_artifact_file_name() -> String {
    "website.html".to_string()
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),

    #[error("telegram token is not set (TELEGRAM_TOKEN)")]
    MissingToken,

    #[error("webhook delivery requires a webhook url (WEBHOOK_URL)")]
    MissingWebhookUrl,

    #[error("invalid webhook url {url:?}: {reason}")]
    InvalidWebhookUrl { url: String, reason: String },
}

// ============================================================================
// Tests
// ============================================================================
