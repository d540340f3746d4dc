use crate::ai::Message;
use crate::config::LlmConfig;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for any OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAICompletionRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAICompletionResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: &str,
        endpoint: &str,
        model: &str,
        max_tokens: u32,
    ) -> Result<Self, String> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // Only add auth header if API key is provided and not empty
        if !api_key.is_empty() {
            let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?;
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            max_tokens,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, String> {
        Self::new(&config.api_key, &config.endpoint, &config.model, config.max_tokens)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request and return the reply text
    pub async fn generate_text(&self, messages: Vec<Message>) -> Result<String, String> {
        let request = self.build_request(messages);

        log::info!(
            "[OPENAI] Sending request to {} with model {} ({} messages)",
            self.endpoint,
            self.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("OpenAI API request failed: {}", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read OpenAI response: {}", e))?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(&response_text) {
                return Err(format!("OpenAI API error: {}", error_response.error.message));
            }
            return Err(format!(
                "OpenAI API returned error status: {}, body: {}",
                status, response_text
            ));
        }

        log::debug!("[OPENAI] Raw response:\n{}", response_text);
        parse_completion(&response_text)
    }

    fn build_request(&self, messages: Vec<Message>) -> OpenAICompletionRequest {
        OpenAICompletionRequest {
            model: self.model.clone(),
            messages: messages
                .into_iter()
                .map(|m| OpenAIMessage {
                    role: m.role.to_string(),
                    content: m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
        }
    }
}

/// Extract the first choice's text from a completion response body
fn parse_completion(body: &str) -> Result<String, String> {
    let response_data: OpenAICompletionResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse OpenAI response: {} - body: {}", e, body))?;

    let choice = response_data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| "OpenAI API returned no choices".to_string())?;

    log::debug!(
        "[OPENAI] Response - content_len: {}, finish_reason: {:?}",
        choice.message.content.as_ref().map(|c| c.len()).unwrap_or(0),
        choice.finish_reason
    );

    Ok(choice.message.content.unwrap_or_default())
}
