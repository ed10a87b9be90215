//! Google Gemini provider implementation.
//!
//! Uses the Generative Language REST API:
//! https://ai.google.dev/api/generate-content

use crate::client::{ChatRequest, ChatRole, LlmClient, LlmResponse, LlmUsage};
use chatbox_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini LLM client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Gemini has no system role inside `contents`: system messages are
    /// folded into `systemInstruction` and assistant turns become `model`.
    fn to_gemini_request(&self, request: &ChatRequest) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in &request.messages {
            let role = match message.role {
                ChatRole::System => {
                    system_parts.push(Part {
                        text: message.content.clone(),
                    });
                    continue;
                }
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            });
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        });

        let generation_config = (request.temperature.is_some() || request.max_tokens.is_some())
            .then(|| GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            });

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    fn convert_response(
        &self,
        model: &str,
        response: GenerateContentResponse,
    ) -> AppResult<LlmResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("Gemini returned no candidates".to_string()))?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = response
            .usage_metadata
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending chat request to Gemini");
        tracing::debug!("Request: {:?}", request);

        let body = self.to_gemini_request(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        tracing::info!("Received chat reply from Gemini");

        self.convert_response(&request.model, parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;

    #[test]
    fn test_request_conversion_maps_roles() {
        let client = GeminiClient::new("key");
        let request = ChatRequest::new(
            "gemini-1.5-flash",
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("Prime"),
                ChatMessage::assistant("Ready"),
                ChatMessage::user("Question"),
            ],
        );

        let body = client.to_gemini_request(&request);
        assert_eq!(body.contents.len(), 3);
        assert_eq!(body.contents[1].role.as_deref(), Some("model"));
        assert_eq!(body.system_instruction.as_ref().unwrap().parts[0].text, "Be brief.");
        assert!(body.generation_config.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["contents"][2]["parts"][0]["text"], "Question");
    }

    #[test]
    fn test_response_conversion() {
        let client = GeminiClient::new("key");
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "The sky "}, {"text": "is blue."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14}
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let response = client.convert_response("gemini-1.5-flash", parsed).unwrap();
        assert_eq!(response.content, "The sky is blue.");
        assert_eq!(response.model, "gemini-1.5-flash");
        assert_eq!(response.usage.total_tokens, 14);
    }

    #[test]
    fn test_response_without_candidates_is_error() {
        let client = GeminiClient::new("key");
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(client.convert_response("gemini-1.5-flash", parsed).is_err());
    }
}
