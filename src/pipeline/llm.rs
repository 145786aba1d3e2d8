//! Backend interaction: send one composed prompt, get one section back.
//!
//! All prompt wording lives in [`crate::prompts`]; this module only moves
//! text to and from the provider.
//!
//! ## Failure policy
//!
//! A call never panics and never aborts the run. Network and HTTP failures
//! come back as [`GenerationError`] values that the aggregator turns into
//! failed sections. There is no retry. A successful reply is returned
//! verbatim, even when it is empty or only whitespace.
//!
//! ## Unusable clients
//!
//! The provider is resolved once, in [`GenerationClient::from_config`]. If
//! that fails (typically a missing API key) the client remembers the error
//! and returns it from every subsequent call without touching the network.

use crate::config::NotesConfig;
use crate::error::GenerationError;
use crate::output::Generation;
use crate::pipeline::compose::ComposedPrompt;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Something that turns one request text into generated text.
///
/// The production implementation is [`ProviderGenerator`]; tests plug in
/// their own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;
}

/// [`TextGenerator`] backed by an `edgequake-llm` provider.
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Apply the sampling settings from `config`.
    pub fn with_config(mut self, config: &NotesConfig) -> Self {
        self.temperature = config.temperature;
        self.max_tokens = config.max_tokens;
        self
    }

    fn build_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..Default::default()
        }
    }
}

#[async_trait]
impl TextGenerator for ProviderGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let messages = request_messages(prompt);
        let options = self.build_options();

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(api_error)?;

        Ok(Generation {
            text: response.content,
            input_tokens: response.prompt_tokens as usize,
            output_tokens: response.completion_tokens as usize,
        })
    }
}

/// The generation client handed to the aggregator.
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn TextGenerator>),
    Unusable(GenerationError),
}

impl GenerationClient {
    /// A client that forwards every call to `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            backend: Backend::Ready(generator),
        }
    }

    /// A client that answers every call with `error`.
    pub fn unusable(error: GenerationError) -> Self {
        Self {
            backend: Backend::Unusable(error),
        }
    }

    /// Resolve the backend from `config`, from most-specific to least-specific:
    ///
    /// 1. **Pre-built generator** (`config.generator`) used as-is.
    /// 2. **Named provider + model** via [`ProviderFactory::create_llm_provider`],
    ///    which reads the provider's API key from the environment.
    ///
    /// A provider that cannot be built yields an unusable client rather than
    /// an error, so the run still produces output.
    pub fn from_config(config: &NotesConfig) -> Self {
        if let Some(ref generator) = config.generator {
            return Self::new(Arc::clone(generator));
        }

        match ProviderFactory::create_llm_provider(&config.provider_name, &config.model) {
            Ok(provider) => {
                info!(
                    "Using LLM provider '{}' with model '{}'",
                    config.provider_name, config.model
                );
                Self::new(Arc::new(ProviderGenerator::new(provider).with_config(config)))
            }
            Err(e) => {
                warn!(
                    "LLM provider '{}' unavailable, every section will carry an error: {}",
                    config.provider_name, e
                );
                Self::unusable(GenerationError::ProviderNotConfigured {
                    provider: config.provider_name.clone(),
                    hint: credential_hint(&config.provider_name),
                })
            }
        }
    }

    /// False when the backend could not be constructed.
    pub fn is_usable(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    /// Send `prompt` to the backend.
    pub async fn generate(&self, prompt: &ComposedPrompt) -> Result<Generation, GenerationError> {
        match &self.backend {
            Backend::Unusable(e) => Err(e.clone()),
            Backend::Ready(generator) => {
                let request = prompt.combined();
                debug!("Sending {} byte prompt", request.len());
                let result = generator.generate(&request).await;
                match &result {
                    Ok(g) => debug!(
                        "{} input tokens, {} output tokens",
                        g.input_tokens, g.output_tokens
                    ),
                    Err(e) => warn!("Generation failed: {}", e),
                }
                result
            }
        }
    }
}

/// The whole prompt travels as one user turn.
fn request_messages(prompt: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(prompt)]
}

fn api_error(e: impl std::fmt::Display) -> GenerationError {
    GenerationError::ApiError {
        detail: e.to_string(),
    }
}

/// Name the environment variable that holds the provider's API key.
fn credential_hint(provider: &str) -> String {
    let var = match provider.to_lowercase().as_str() {
        "gemini" | "google" => "GEMINI_API_KEY".to_string(),
        "openai" => "OPENAI_API_KEY".to_string(),
        "anthropic" => "ANTHROPIC_API_KEY".to_string(),
        other => format!("{}_API_KEY", other.to_uppercase().replace('-', "_")),
    };
    format!("Set {var} in the environment or a .env file.")
}
