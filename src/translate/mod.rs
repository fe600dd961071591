// Translation backends
//
// Every backend implements `TranslationService`:
// - chat: OpenAI-compatible chat completion endpoint (LLM)
// - literal: Google translate_a/single machine translation
// The router picks between a regional and a general backend per language.

pub mod chat;
pub mod literal;
pub mod router;

#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub use router::TranslationRouter;

use crate::config::{ServiceConfig, ServiceKind};
use crate::error::{Result, SubrelayError};
use crate::language::Language;

/// A hosted translation API. Any error is treated as opaque by callers.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Number of API keys the service rotates through
    fn credential_count(&self) -> usize {
        1
    }

    async fn translate(&self, text: &str, language: &Language) -> Result<String>;
}

/// Outcome of translating one piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Translated { text: String, service: String },
    /// No service produced a translation, the original text is passed through
    Unavailable { original: String },
}

impl Translation {
    pub fn text(&self) -> &str {
        match self {
            Self::Translated { text, .. } => text,
            Self::Unavailable { original } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Translated { text, .. } => text,
            Self::Unavailable { original } => original,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, Self::Translated { .. })
    }
}

/// Factory for creating service instances from configuration
pub struct ServiceFactory;

impl ServiceFactory {
    /// Build the service described by `config`. A chat service without API
    /// keys cannot be called and is left out.
    pub fn create(
        label: &str,
        config: &ServiceConfig,
    ) -> Result<Option<Arc<dyn TranslationService>>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SubrelayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        match config.kind {
            ServiceKind::ChatCompletion => {
                if config.api_keys.is_empty() {
                    warn!("{} chat service has no API keys configured, disabling it", label);
                    return Ok(None);
                }
                Ok(Some(Arc::new(chat::ChatCompletionService::new(
                    label, config, client,
                ))))
            }
            ServiceKind::Literal => Ok(Some(Arc::new(literal::LiteralService::new(
                label, config, client,
            )))),
        }
    }
}
