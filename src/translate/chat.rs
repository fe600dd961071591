use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TranslationService;
use crate::config::ServiceConfig;
use crate::credentials::CredentialRotator;
use crate::error::{Result, SubrelayError};
use crate::language::Language;

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

/// Some models answer with `{"text": "..."}` despite being asked for plain text
#[derive(Debug, Deserialize)]
struct TranslationResult {
    text: String,
}

/// LLM translation through an OpenAI-compatible chat completion endpoint
pub struct ChatCompletionService {
    name: String,
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    credentials: CredentialRotator,
}

impl ChatCompletionService {
    pub fn new(name: &str, config: &ServiceConfig, client: Client) -> Self {
        Self {
            name: name.to_string(),
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            credentials: CredentialRotator::new(config.api_keys.iter().cloned()),
        }
    }

    fn build_system_prompt(&self, language: &Language) -> String {
        format!(
            "You are a professional subtitle translator.\n\
             Translate the user's text into {} ({}).\n\
             Return ONLY the translation. Keep the line breaks of the source.\n\
             Do not add explanations, alternatives, quotes or notes.",
            language.name, language.code
        )
    }

    fn build_user_prompt(&self, text: &str, language: &Language) -> String {
        format!("Translate into {}:\n\n{}", language.name, text)
    }

    /// Strip wrappers models like to add around the answer
    fn clean_translation_response(&self, response: &str) -> String {
        let mut text = response.trim();

        if let Some(inner) = text.strip_prefix("```") {
            // Drop an optional language tag after the opening fence
            let inner = inner.split_once('\n').map(|(_, rest)| rest).unwrap_or(inner);
            text = inner.strip_suffix("```").unwrap_or(inner).trim();
        }

        for (open, close) in [('"', '"'), ('“', '”'), ('«', '»')] {
            if text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close) {
                let inner = &text[open.len_utf8()..text.len() - close.len_utf8()];
                if !inner.contains(open) && !inner.contains(close) {
                    text = inner.trim();
                }
                break;
            }
        }

        text.to_string()
    }
}

#[async_trait]
impl TranslationService for ChatCompletionService {
    fn name(&self) -> &str {
        &self.name
    }

    fn credential_count(&self) -> usize {
        self.credentials.len().max(1)
    }

    async fn translate(&self, text: &str, language: &Language) -> Result<String> {
        let api_key = self.credentials.next().ok_or_else(|| {
            SubrelayError::Config(format!("{} has no API key configured", self.name))
        })?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.build_system_prompt(language),
                },
                ChatMessage {
                    role: "user",
                    content: self.build_user_prompt(text, language),
                },
            ],
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Sending chat translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubrelayError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SubrelayError::Translation(format!(
                "{} API error {}: {}",
                self.name, status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| SubrelayError::Translation(format!("Failed to parse response: {}", e)))?;

        let raw_response = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let raw_response = raw_response.trim();

        debug!("Raw chat response: {}", raw_response);

        let cleaned = match serde_json::from_str::<TranslationResult>(raw_response) {
            Ok(result) => self.clean_translation_response(&result.text),
            Err(_) => self.clean_translation_response(raw_response),
        };
        if cleaned.is_empty() {
            return Err(SubrelayError::Translation(
                "Empty translation received".to_string(),
            ));
        }
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceKind;
    use crate::language;
    use httpmock::prelude::*;
    use serde_json::json;

    fn service_for(server: &MockServer, keys: &[&str]) -> ChatCompletionService {
        let config = ServiceConfig {
            kind: ServiceKind::ChatCompletion,
            endpoint: format!("{}/v1/", server.base_url()),
            model: "test-model".to_string(),
            api_keys: keys.iter().map(|k| k.to_string()).collect(),
            temperature: 0.3,
            timeout_secs: 5,
        };
        ChatCompletionService::new("regional", &config, Client::new())
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn test_translate_sends_language_and_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer key-1")
                    .body_contains("French")
                    .body_contains("Hello there");
                then.status(200).json_body(completion("  Bonjour à tous \n"));
            })
            .await;

        let service = service_for(&server, &["key-1"]);
        let french = language::find("fr").unwrap();
        let translated = service.translate("Hello there", french).await.unwrap();

        assert_eq!(translated, "Bonjour à tous");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rotates_api_keys() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(POST).header("authorization", "Bearer a");
                then.status(200).json_body(completion("uno"));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(POST).header("authorization", "Bearer b");
                then.status(200).json_body(completion("dos"));
            })
            .await;

        let service = service_for(&server, &["a", "b"]);
        let spanish = language::find("es").unwrap();
        for _ in 0..4 {
            service.translate("one", spanish).await.unwrap();
        }

        assert_eq!(first.hits_async().await, 2);
        assert_eq!(second.hits_async().await, 2);
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("rate limited");
            })
            .await;

        let service = service_for(&server, &["k"]);
        let result = service.translate("Hello", language::find("de").unwrap()).await;
        assert!(matches!(result, Err(SubrelayError::Translation(msg)) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let service = service_for(&server, &["k"]);
        let result = service.translate("Hello", language::find("de").unwrap()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_json_wrapped_answer() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(completion(r#"{"text": "Hallo"}"#));
            })
            .await;

        let service = service_for(&server, &["k"]);
        let result = service.translate("Hello", language::find("de").unwrap()).await;
        assert_eq!(result.unwrap(), "Hallo");
    }

    #[tokio::test]
    async fn test_blank_json_answer_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(completion(r#"{"text": "  "}"#));
            })
            .await;

        let service = service_for(&server, &["k"]);
        let result = service.translate("Hello", language::find("de").unwrap()).await;
        assert!(matches!(result, Err(SubrelayError::Translation(msg)) if msg.contains("Empty")));
    }

    #[tokio::test]
    async fn test_blank_answer_falls_back_to_general_service() {
        use crate::language::RegionalSet;
        use crate::translate::stub::StubService;
        use crate::translate::{Translation, TranslationRouter};
        use std::sync::Arc;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(completion(r#"{"text": "  "}"#));
            })
            .await;

        let general = Arc::new(StubService::prefixing("general"));
        let router = TranslationRouter::new(
            Some(Arc::new(service_for(&server, &["k"]))),
            Some(general.clone()),
            RegionalSet::new(["fr"]),
        );

        let result = router.translate("Hello", language::find("fr").unwrap()).await;
        assert_eq!(
            result,
            Translation::Translated {
                text: "[French] Hello".to_string(),
                service: "general".to_string()
            }
        );
        assert_eq!(general.calls(), 1);
    }

    #[test]
    fn test_user_prompt_names_language_and_text() {
        let config = ServiceConfig {
            api_keys: vec!["k".to_string()],
            ..ServiceConfig::default_regional()
        };
        let service = ChatCompletionService::new("regional", &config, Client::new());
        let prompt = service.build_user_prompt("Good night", language::find("jp").unwrap());
        assert!(prompt.contains("Japanese"));
        assert!(prompt.ends_with("Good night"));
    }

    #[test]
    fn test_clean_translation_response() {
        let config = ServiceConfig {
            api_keys: vec!["k".to_string()],
            ..ServiceConfig::default_regional()
        };
        let service = ChatCompletionService::new("regional", &config, Client::new());

        assert_eq!(service.clean_translation_response("```\nSalut\n```"), "Salut");
        assert_eq!(service.clean_translation_response("```text\nLigne 1\nLigne 2\n```"), "Ligne 1\nLigne 2");
        assert_eq!(service.clean_translation_response("\"Salut\""), "Salut");
        assert_eq!(service.clean_translation_response("« Salut »"), "Salut");
        assert_eq!(service.clean_translation_response("\"a\" et \"b\""), "\"a\" et \"b\"");
        assert_eq!(service.clean_translation_response("  plain  "), "plain");
    }
}
