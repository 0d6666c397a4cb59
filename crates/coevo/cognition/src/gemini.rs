//! Minimal Gemini `generateContent` transport.

use crate::error::CognitionError;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const AUTH_ENV_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Thin client over the Gemini REST API. One call per request, no retry.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CognitionError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .no_proxy()
            .build()
            .map_err(|e| CognitionError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self, CognitionError> {
        let api_key =
            std::env::var(AUTH_ENV_VAR).map_err(|_| CognitionError::MissingApiKey(AUTH_ENV_VAR))?;
        Self::new(api_key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Free-text completion.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, CognitionError> {
        self.generate(prompt, false).await
    }

    /// Completion with `responseMimeType: application/json`, for prompts that
    /// demand structured output. The returned string still needs parsing.
    pub async fn generate_json(&self, prompt: &str) -> Result<String, CognitionError> {
        self.generate(prompt, true).await
    }

    async fn generate(&self, prompt: &str, structured: bool) -> Result<String, CognitionError> {
        let url = self.request_url()?;

        let mut payload = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });
        if structured {
            payload["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CognitionError::Transport(format!("gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CognitionError::Provider {
                status,
                body: truncate(&body, 320),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CognitionError::MalformedResponse(format!("invalid gemini body: {}", e)))?;

        let output = body["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate["content"]["parts"].as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        let output = output.trim().to_string();
        if output.is_empty() {
            return Err(CognitionError::EmptyResponse);
        }
        Ok(output)
    }

    fn request_url(&self) -> Result<Url, CognitionError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| CognitionError::Transport(format!("invalid endpoint {}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_embeds_model_and_key() {
        let client = GeminiClient::new("secret").unwrap().with_model("gemini-pro");
        let url = client.request_url().unwrap();
        assert!(url.path().contains("models/gemini-pro:generateContent"));
        assert!(url.query_pairs().any(|(k, v)| k == "key" && v == "secret"));
    }

    #[test]
    fn custom_endpoint_trailing_slash_trimmed() {
        let client = GeminiClient::new("k")
            .unwrap()
            .with_endpoint("http://127.0.0.1:9099/");
        let url = client.request_url().unwrap();
        assert!(url.as_str().starts_with("http://127.0.0.1:9099/v1beta/"));
    }

    #[test]
    fn truncate_marks_overflow() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ab", 3), "ab");
    }
}
