use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::TranslationService;
use crate::config::ServiceConfig;
use crate::error::{Result, SubrelayError};
use crate::language::Language;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Literal machine translation through Google's `translate_a/single` endpoint
pub struct LiteralService {
    name: String,
    client: Client,
    endpoint: String,
}

impl LiteralService {
    pub fn new(name: &str, config: &ServiceConfig, client: Client) -> Self {
        Self {
            name: name.to_string(),
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Concatenate the `[0][*][0]` segments of the response
    fn extract_translation(body: &serde_json::Value) -> Result<String> {
        let segments = body.get(0).and_then(|v| v.as_array()).ok_or_else(|| {
            SubrelayError::Translation(
                "Invalid translation response format: missing segments".to_string(),
            )
        })?;

        let translation: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
            .collect();

        if translation.trim().is_empty() {
            return Err(SubrelayError::Translation(
                "Empty translation received".to_string(),
            ));
        }

        Ok(translation)
    }
}

#[async_trait]
impl TranslationService for LiteralService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str, language: &Language) -> Result<String> {
        let url = format!("{}/translate_a/single", self.endpoint);
        debug!("Translating {} chars to {} via {}", text.len(), language.code, url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", language.code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| SubrelayError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned error: {} - {}", self.name, status, body);
            return Err(SubrelayError::Translation(format!(
                "{} API error {}",
                self.name, status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SubrelayError::Translation(format!("Failed to parse response: {}", e)))?;

        Self::extract_translation(&body)
    }
}
