//! Configuration types for Parley.
//!
//! `ParleyConfig` represents the `parley.toml` file that controls the history
//! window, monthly quota tiers, canned replies, the generative backend, and the
//! HTTP listener. Every field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quota::QuotaLimits;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub replies: RepliesConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl ParleyConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_turns == 0 {
            return Err(ConfigError::Invalid(
                "history.max_turns must be at least 1".to_string(),
            ));
        }

        let q = &self.quota;
        if let (Some(warning), Some(exhausted)) = (q.warning_threshold, q.exhausted_threshold) {
            if warning > exhausted {
                return Err(ConfigError::Invalid(format!(
                    "quota.warning_threshold ({warning}) exceeds quota.exhausted_threshold ({exhausted})"
                )));
            }
        }
        for (name, value) in [
            ("warning_threshold", q.warning_threshold),
            ("exhausted_threshold", q.exhausted_threshold),
        ] {
            if let Some(v) = value {
                if v > q.max_turns_per_month {
                    return Err(ConfigError::Invalid(format!(
                        "quota.{name} ({v}) exceeds quota.max_turns_per_month ({})",
                        q.max_turns_per_month
                    )));
                }
            }
        }

        if !(0.0..=2.0).contains(&self.backend.temperature) {
            return Err(ConfigError::Invalid(format!(
                "backend.temperature must be within 0.0..=2.0, got {}",
                self.backend.temperature
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.backend.provider == BackendProvider::Custom && self.backend.base_url.is_none() {
            return Err(ConfigError::Invalid(
                "backend.base_url is required when backend.provider = \"custom\"".to_string(),
            ));
        }

        Ok(())
    }
}

/// Conversation window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of prompter/responder pairs kept per user.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

fn default_max_turns() -> usize {
    5
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

/// Monthly quota settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_max_turns_per_month")]
    pub max_turns_per_month: u32,

    /// Count at which the warning reply replaces backend calls. `None` skips the tier.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: Option<u32>,

    /// Count at which the exhausted reply is sent. `None` skips the tier.
    #[serde(default = "default_exhausted_threshold")]
    pub exhausted_threshold: Option<u32>,

    /// Whether a failed backend call still consumes a quota unit.
    #[serde(default = "default_charge_on_backend_failure")]
    pub charge_on_backend_failure: bool,

    /// Offset from UTC, in minutes, used to decide which calendar month "now" is in.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_max_turns_per_month() -> u32 {
    30
}

fn default_warning_threshold() -> Option<u32> {
    Some(15)
}

fn default_exhausted_threshold() -> Option<u32> {
    Some(25)
}

fn default_charge_on_backend_failure() -> bool {
    true
}

impl QuotaConfig {
    pub fn limits(&self) -> QuotaLimits {
        QuotaLimits {
            max_turns_per_month: self.max_turns_per_month,
            warning_threshold: self.warning_threshold,
            exhausted_threshold: self.exhausted_threshold,
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_turns_per_month: default_max_turns_per_month(),
            warning_threshold: default_warning_threshold(),
            exhausted_threshold: default_exhausted_threshold(),
            charge_on_backend_failure: default_charge_on_backend_failure(),
            utc_offset_minutes: 0,
        }
    }
}

/// Fixed reply texts used instead of (or after) a backend call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepliesConfig {
    #[serde(default = "default_warning_reply")]
    pub warning: String,

    #[serde(default = "default_exhausted_reply")]
    pub exhausted: String,

    /// Link appended to the exhausted reply, if set.
    #[serde(default)]
    pub referral_url: Option<String>,

    /// Sent when the backend call fails or times out.
    #[serde(default = "default_apology_reply")]
    pub apology: String,
}

fn default_warning_reply() -> String {
    "Thank you for talking with me so much this month.\nLet's talk again next month!".to_string()
}

fn default_exhausted_reply() -> String {
    "I can't reply any more this month. Please come back and talk to me next month.".to_string()
}

fn default_apology_reply() -> String {
    "Sorry, I couldn't answer that right now. Please try again in a little while.".to_string()
}

impl RepliesConfig {
    /// The exhausted reply with the referral link appended on its own line.
    pub fn exhausted_text(&self) -> String {
        match self.referral_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => format!("{}\n{}", self.exhausted, url),
            _ => self.exhausted.clone(),
        }
    }
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            warning: default_warning_reply(),
            exhausted: default_exhausted_reply(),
            referral_url: None,
            apology: default_apology_reply(),
        }
    }
}

/// Which OpenAI-compatible endpoint to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    #[default]
    OpenAi,
    Gemini,
    Mistral,
    /// Any OpenAI-compatible server at `base_url`.
    Custom,
}

/// Generative backend settings. The persona text is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub provider: BackendProvider,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// System prompt sent ahead of the conversation window.
    #[serde(default)]
    pub persona: String,

    /// File to read the persona from at startup. Takes precedence over `persona`.
    #[serde(default)]
    pub persona_file: Option<String>,
}

fn default_model() -> String {
    "gpt-4-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            persona: String::new(),
            persona_file: None,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
