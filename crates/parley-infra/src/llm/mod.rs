//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](parley_core::llm::LlmProvider)
//! used by Parley and a factory that builds it from the `[backend]` config.

pub mod openai_compat;

use secrecy::SecretString;

use parley_core::llm::BoxLlmProvider;
use parley_types::config::BackendConfig;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[backend]` config section.
pub fn create_provider(backend: &BackendConfig, api_key: SecretString) -> BoxLlmProvider {
    let config = openai_compat::config::from_backend_config(backend, api_key);
    tracing::info!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        model = %config.model,
        "configured generative backend"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(config))
}
