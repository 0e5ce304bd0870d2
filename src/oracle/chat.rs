use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OracleConfig;
use crate::oracle::QueryCorrector;
use crate::error::{PriceEngineError, Result};

const SYSTEM_PROMPT: &str = "You fix video game titles. The user types an inexact title. \
Reply with the single most likely title of a known video game, even when you are not fully sure. \
Return ONLY the title. Do not answer NOT_FOUND when there is a reasonable guess.";

/// OpenAI-compatible chat completion client used as a spelling oracle
pub struct ChatCompletionCorrector {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionCorrector {
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    fn request_body<'a>(&'a self, query: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: query },
            ],
        }
    }
}

/// First non-blank completion, trimmed
fn extract_title(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|title| !title.is_empty())
        .ok_or_else(|| PriceEngineError::Oracle("empty completion".to_string()))
}

#[async_trait]
impl QueryCorrector for ChatCompletionCorrector {
    async fn correct(&self, query: &str) -> Result<String> {
        let query = query.trim();
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PriceEngineError::Oracle("API key is not set".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Oracle request for '{}' ({})", query, self.model);

        let response = self.client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(|e| PriceEngineError::Oracle(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PriceEngineError::Oracle(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| PriceEngineError::Oracle(format!("Invalid JSON: {}", e)))?;

        let title = extract_title(body)?;
        tracing::debug!("Oracle answered '{}' → '{}'", query, title);
        Ok(title)
    }

    fn name(&self) -> &str {
        "chat-completion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_trims() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Half-Life\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_title(body).unwrap(), "Half-Life");
    }

    #[test]
    fn test_extract_title_rejects_empty() {
        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_title(no_choices).is_err());

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(extract_title(blank).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let corrector = ChatCompletionCorrector::new(&OracleConfig::default()).unwrap();
        let json = serde_json::to_value(corrector.request_body("haf life")).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "haf life");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let corrector = ChatCompletionCorrector::new(&OracleConfig::default()).unwrap();
        let err = corrector.correct("haf life").await.unwrap_err();
        assert!(matches!(err, PriceEngineError::Oracle(_)));
    }
}
