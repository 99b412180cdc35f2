//! Remote AI extractor over an OpenAI-compatible chat completions API.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UpstreamError;
use crate::models::config::RemoteConfig;
use crate::models::record::DocumentKind;

use super::reply::{build_prompt, instruction};

/// A remote extractor that turns document text into a JSON reply.
///
/// Implementations only move text; interpreting the reply is done by the
/// orchestrator so that every extractor gets the same normalization.
pub trait RemoteExtractor: Send + Sync {
    fn extract(
        &self,
        kind: DocumentKind,
        text: &str,
    ) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}

/// HTTP client for chat completions endpoints.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpExtractor {
    /// Build a client from configuration and the API key in the environment.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, UpstreamError> {
        if !config.enabled {
            return Err(UpstreamError::Disabled);
        }

        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| UpstreamError::MissingCredential(config.api_key_env.clone()))?;

        Self::new(&config.endpoint, &config.model, api_key, config.timeout_secs)
    }

    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: String,
        timeout_secs: u64,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl RemoteExtractor for HttpExtractor {
    async fn extract(&self, kind: DocumentKind, text: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let prompt = build_prompt(text);
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
            messages: [
                ChatMessage {
                    role: "system",
                    content: instruction(kind),
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| UpstreamError::MalformedReply("empty completion".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_rejected() {
        let config = RemoteConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(matches!(
            HttpExtractor::from_config(&config),
            Err(UpstreamError::Disabled)
        ));
    }

    #[test]
    fn test_missing_credential() {
        let config = RemoteConfig {
            api_key_env: "SPORTINTAKE_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        match HttpExtractor::from_config(&config) {
            Err(UpstreamError::MissingCredential(var)) => assert_eq!(var, "SPORTINTAKE_TEST_UNSET_KEY"),
            other => panic!("expected missing credential, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_endpoint_is_normalized() {
        let extractor = HttpExtractor::new("https://example.test/v1/", "gpt-4o-mini", "k".into(), 5).unwrap();
        assert_eq!(extractor.endpoint, "https://example.test/v1");
        assert_eq!(extractor.model(), "gpt-4o-mini");
    }
}
