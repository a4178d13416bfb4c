//! Connection settings and per-provider presets for OpenAI-compatible backends.

use secrecy::SecretString;

use parley_types::config::{BackendConfig, BackendProvider};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves `model` empty.
    pub model: String,
}

fn preset(name: &str, base_url: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: name.into(),
        base_url: base_url.into(),
        api_key,
        model: model.into(),
    }
}

fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("openai", OPENAI_BASE_URL, api_key, model)
}

fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("gemini", GEMINI_BASE_URL, api_key, model)
}

fn mistral_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("mistral", MISTRAL_BASE_URL, api_key, model)
}

/// Build the connection settings described by the `[backend]` config section.
///
/// An explicit `base_url` wins over the provider's preset URL.
pub fn from_backend_config(backend: &BackendConfig, api_key: SecretString) -> OpenAiCompatConfig {
    let mut config = match backend.provider {
        BackendProvider::OpenAi => openai_defaults(api_key, &backend.model),
        BackendProvider::Gemini => gemini_defaults(api_key, &backend.model),
        BackendProvider::Mistral => mistral_defaults(api_key, &backend.model),
        BackendProvider::Custom => preset("custom", OPENAI_BASE_URL, api_key, &backend.model),
    };
    if let Some(url) = backend.base_url.as_deref() {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    config
}
