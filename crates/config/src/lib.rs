//! Configuration loading, validation, and management for the Consequences game.
//!
//! Loads configuration from `~/.consequences/config.toml` (or an explicit
//! path) with environment variable overrides. Validates all settings at
//! startup so a misconfigured renderer or notifier fails before any message
//! goes out.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of categories in a consequence: subject, object, location,
/// subject utterance, object utterance, outcome.
pub const CATEGORY_COUNT: usize = 6;

/// The root configuration structure.
///
/// Maps directly to `~/.consequences/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Session window detection and quota tolerance
    #[serde(default)]
    pub window: WindowConfig,

    /// Category labels of the response form
    #[serde(default)]
    pub categories: CategoriesConfig,

    /// Consequence message layout and filler
    #[serde(default)]
    pub render: RenderConfig,

    /// Where the response log and roster tables live
    #[serde(default)]
    pub stores: StoresConfig,

    /// Message delivery
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Form-link invitations sent at the start of a session
    #[serde(default)]
    pub invitation: InvitationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Largest gap, in seconds, between the newest response and any other
    /// response of the same session
    #[serde(default = "default_max_ok_range_secs")]
    pub max_ok_range_secs: i64,

    /// How many participants may fail to respond before the run aborts
    #[serde(default = "default_max_ok_missing")]
    pub max_ok_missing: usize,

    /// `chrono` format strings tried, in order, after RFC 3339
    #[serde(default = "default_timestamp_formats")]
    pub timestamp_formats: Vec<String>,
}

fn default_max_ok_range_secs() -> i64 {
    420
}
fn default_max_ok_missing() -> usize {
    2
}
fn default_timestamp_formats() -> Vec<String> {
    vec![
        "%d/%m/%Y %H:%M:%S".into(),
        "%Y-%m-%d %H:%M:%S".into(),
        "%m/%d/%Y %H:%M:%S".into(),
        "%Y-%m-%dT%H:%M:%S".into(),
    ]
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_ok_range_secs: default_max_ok_range_secs(),
            max_ok_missing: default_max_ok_missing(),
            timestamp_formats: default_timestamp_formats(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

fn default_labels() -> Vec<String> {
    vec![
        "Subject".into(),
        "Object".into(),
        "Location".into(),
        "Subject said".into(),
        "Object said".into(),
        "Consequence".into(),
    ]
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            labels: default_labels(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_divider")]
    pub divider: String,

    #[serde(default = "default_outcome_intro")]
    pub outcome_intro: String,

    /// Subject line of consequence messages
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Filler assignment used when participants outnumber responses
    #[serde(default = "default_dummy")]
    pub dummy: Vec<String>,
}

fn default_divider() -> String {
    "----------".into()
}
fn default_outcome_intro() -> String {
    "And the consequence was...".into()
}
fn default_subject() -> String {
    "Your consequence".into()
}
fn default_dummy() -> Vec<String> {
    vec![
        "The Invisible Man".into(),
        "A Lost Sock".into(),
        "the bottom of the laundry basket".into(),
        "Haven't we met before?".into(),
        "I was here first.".into(),
        "They went their separate ways.".into(),
    ]
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            divider: default_divider(),
            outcome_intro: default_outcome_intro(),
            subject: default_subject(),
            dummy: default_dummy(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoresConfig {
    #[serde(default = "default_responses_path")]
    pub responses_path: PathBuf,

    #[serde(default = "default_roster_path")]
    pub roster_path: PathBuf,
}

fn default_responses_path() -> PathBuf {
    GameConfig::config_dir().join("responses.jsonl")
}
fn default_roster_path() -> PathBuf {
    GameConfig::config_dir().join("roster.jsonl")
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            responses_path: default_responses_path(),
            roster_path: default_roster_path(),
        }
    }
}

/// Which notifier delivers messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    #[default]
    Console,
    Outbox,
    Webhook,
}

impl std::fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Console => "console",
            Self::Outbox => "outbox",
            Self::Webhook => "webhook",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub notifier: NotifierKind,

    /// JSON-lines file the outbox notifier appends to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbox_path: Option<PathBuf>,

    /// Mail relay endpoint for the webhook notifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// HMAC secret used to sign webhook payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            notifier: NotifierKind::default(),
            outbox_path: None,
            webhook_url: None,
            webhook_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("notifier", &self.notifier)
            .field("outbox_path", &self.outbox_path)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    /// Link to the response form
    #[serde(default)]
    pub form_url: String,

    #[serde(default = "default_invitation_subject")]
    pub subject: String,

    /// Body template; `{name}` and `{form_url}` are substituted
    #[serde(default = "default_invitation_template")]
    pub template: String,
}

fn default_invitation_subject() -> String {
    "Consequences: time to play".into()
}
fn default_invitation_template() -> String {
    "Hi {name},\n\nA new round of Consequences is starting. Fill in the form here:\n\n{form_url}\n\nYour consequence will arrive once everyone has answered.\n".into()
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            form_url: String::new(),
            subject: default_invitation_subject(),
            template: default_invitation_template(),
        }
    }
}

impl GameConfig {
    /// Load configuration from the default path (~/.consequences/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `CONSEQUENCES_MAX_OK_RANGE`
    /// - `CONSEQUENCES_MAX_OK_MISSING`
    /// - `CONSEQUENCES_WEBHOOK_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from an explicit path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(range) = lookup("CONSEQUENCES_MAX_OK_RANGE") {
            self.window.max_ok_range_secs = range.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CONSEQUENCES_MAX_OK_RANGE must be a whole number of seconds, got '{range}'"
                ))
            })?;
        }

        if let Some(missing) = lookup("CONSEQUENCES_MAX_OK_MISSING") {
            self.window.max_ok_missing = missing.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CONSEQUENCES_MAX_OK_MISSING must be a non-negative integer, got '{missing}'"
                ))
            })?;
        }

        if let Some(secret) = lookup("CONSEQUENCES_WEBHOOK_SECRET") {
            self.delivery.webhook_secret = Some(secret);
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".consequences")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.max_ok_range_secs < 0 {
            return Err(ConfigError::ValidationError(
                "window.max_ok_range_secs must not be negative".into(),
            ));
        }

        if self.window.timestamp_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "window.timestamp_formats must list at least one format".into(),
            ));
        }

        if self.categories.labels.len() != CATEGORY_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "categories.labels must have {CATEGORY_COUNT} entries, found {}",
                self.categories.labels.len()
            )));
        }

        if self.render.dummy.len() != CATEGORY_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "render.dummy must have {CATEGORY_COUNT} entries, found {}",
                self.render.dummy.len()
            )));
        }

        if self.delivery.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "delivery.timeout_secs must be > 0".into(),
            ));
        }

        match self.delivery.notifier {
            NotifierKind::Webhook if self.delivery.webhook_url.is_none() => {
                return Err(ConfigError::ValidationError(
                    "delivery.webhook_url is required for the webhook notifier".into(),
                ));
            }
            NotifierKind::Outbox if self.delivery.outbox_path.is_none() => {
                return Err(ConfigError::ValidationError(
                    "delivery.outbox_path is required for the outbox notifier".into(),
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.max_ok_range_secs, 420);
        assert_eq!(config.window.max_ok_missing, 2);
        assert_eq!(config.delivery.notifier, NotifierKind::Console);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = GameConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: GameConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.window.max_ok_range_secs, config.window.max_ok_range_secs);
        assert_eq!(parsed.render.dummy, config.render.dummy);
    }

    #[test]
    fn wrong_label_count_rejected() {
        let mut config = GameConfig::default();
        config.categories.labels.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_dummy_count_rejected() {
        let mut config = GameConfig::default();
        config.render.dummy.push("extra".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn webhook_without_url_rejected() {
        let mut config = GameConfig::default();
        config.delivery.notifier = NotifierKind::Webhook;
        assert!(config.validate().is_err());

        config.delivery.webhook_url = Some("https://relay.example.com/send".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn outbox_without_path_rejected() {
        let mut config = GameConfig::default();
        config.delivery.notifier = NotifierKind::Outbox;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = GameConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.window.max_ok_range_secs, 420);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[window]
max_ok_range_secs = 600

[delivery]
notifier = "outbox"
outbox_path = "/tmp/outbox.jsonl"
"#
        )
        .unwrap();

        let config = GameConfig::load_from(file.path()).unwrap();
        assert_eq!(config.window.max_ok_range_secs, 600);
        assert_eq!(config.window.max_ok_missing, 2);
        assert_eq!(config.delivery.notifier, NotifierKind::Outbox);
        assert_eq!(config.render.divider, "----------");
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window\nmax_ok_range_secs = ").unwrap();
        let err = GameConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn overrides_replace_window_constants() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONSEQUENCES_MAX_OK_RANGE", "900"),
            ("CONSEQUENCES_MAX_OK_MISSING", "0"),
            ("CONSEQUENCES_WEBHOOK_SECRET", "s3cret"),
        ]);
        let mut config = GameConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.window.max_ok_range_secs, 900);
        assert_eq!(config.window.max_ok_missing, 0);
        assert_eq!(config.delivery.webhook_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = GameConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "CONSEQUENCES_MAX_OK_MISSING").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn debug_redacts_webhook_secret() {
        let mut config = GameConfig::default();
        config.delivery.webhook_secret = Some("s3cret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = GameConfig::default_toml();
        assert!(toml_str.contains("max_ok_range_secs = 420"));
        assert!(toml_str.contains("And the consequence was..."));
    }
}
