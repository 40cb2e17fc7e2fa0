//! Chat adapter for the Gemini `generateContent` REST API.

use crate::domain::ports::ChatService;
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

const SYSTEM_INSTRUCTION: &str = "Your name is Paysmart, an expert in financial services, \
     digital payments, and customer support. You greet customers warmly and provide clear, \
     practical answers to their questions about payments, transactions, account management, \
     and financial tips. Keep responses short and simple unless more detail is needed. \
     Focus on practical advice and avoid unnecessary technical jargon. Use relatable \
     examples and tips to make understanding financial processes easy. Tailor your \
     responses to the customer's needs and suggest real-world solutions for seamless \
     payments, financial planning, and better money management. Be friendly, insightful, \
     and supportive, ensuring customers feel confident and assisted.";

/// One-shot chat completions with the Paysmart assistant persona.
#[derive(Clone)]
pub struct GeminiChat {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiChat {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain",
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| AgentError::Chat("model returned no text candidates".to_string()))
}

#[async_trait]
impl ChatService for GeminiChat {
    async fn send(&self, message: &str) -> Result<String> {
        let url = format!(
            "{BASE_URL}/{model}:generateContent?key={api_key}",
            model = self.model,
            api_key = self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            system_instruction: Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig::default(),
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| AgentError::Chat(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            tracing::error!(%status, %body, "chat completion rejected");
            return Err(AgentError::Chat(format!("HTTP {status}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Chat(format!("malformed response: {err}")))?;

        extract_text(parsed)
    }
}
