//! Configuration loader for Parley.
//!
//! Reads `parley.toml` and deserializes it into [`ParleyConfig`]. Falls back
//! to defaults when the file is missing or malformed, then resolves the
//! persona file and validates the result. Credentials never live in the file;
//! they are read from the environment into [`Secrets`].

use std::path::Path;

use secrecy::SecretString;

use parley_types::config::ParleyConfig;
use parley_types::error::ConfigError;

/// Environment variable holding the backend API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the LINE channel secret (webhook signing key).
pub const LINE_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
/// Environment variable holding the LINE channel access token (reply API).
pub const LINE_CHANNEL_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`ParleyConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(path: &Path) -> ParleyConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ParleyConfig::default()
        }
    }
}

/// Replace `backend.persona` with the contents of `backend.persona_file`, if set.
///
/// Relative paths are resolved against `base_dir` (the config file's directory).
pub async fn resolve_persona(
    config: &mut ParleyConfig,
    base_dir: &Path,
) -> Result<(), ConfigError> {
    let Some(file) = config.backend.persona_file.as_deref() else {
        return Ok(());
    };

    let path = base_dir.join(file);
    let persona = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    tracing::debug!(path = %path.display(), chars = persona.chars().count(), "loaded persona file");
    config.backend.persona = persona;
    Ok(())
}

/// Load, resolve, and validate the configuration at `path`.
pub async fn load_and_validate(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let mut config = load_config(path).await;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_persona(&mut config, base_dir).await?;
    config.validate()?;
    Ok(config)
}

/// Credentials read from the environment.
///
/// Does NOT derive Debug; values are only exposed where a request is built.
pub struct Secrets {
    pub openai_api_key: SecretString,
    pub line_channel_secret: SecretString,
    pub line_channel_access_token: SecretString,
}

impl Secrets {
    /// Read all secrets from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read all secrets through `lookup`. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
                .ok_or_else(|| ConfigError::MissingSecret(key.to_string()))
        };

        Ok(Self {
            openai_api_key: get(OPENAI_API_KEY)?,
            line_channel_secret: get(LINE_CHANNEL_SECRET)?,
            line_channel_access_token: get(LINE_CHANNEL_ACCESS_TOKEN)?,
        })
    }
}
