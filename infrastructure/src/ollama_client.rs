use anyhow::Context;
use domain::{GenerationFailure, StoryGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;

const STORYTELLER_PROMPT: &str = "You are Story Genie, a warm and imaginative storyteller. \
Write a complete short story (roughly 300 to 600 words) inspired by the user's idea. \
Give it a clear beginning, middle and end. Separate paragraphs with a single newline. \
Respond with the story text only: no title, no markdown, no commentary.";

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ollama_base_url.clone(), config.ollama_model.clone())
    }

    async fn chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: STORYTELLER_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
        };

        info!(model = %self.model, %url, "requesting story");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed contacting Ollama")?;
        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed reading Ollama response")?;
        debug!(%status, bytes = text.len(), "ollama responded");

        if !status.is_success() {
            return Err(anyhow::anyhow!("Ollama API error ({}): {}", status, error_detail(&text)));
        }
        parse_chat_body(&text)
    }
}

impl StoryGenerator for OllamaClient {
    async fn generate_story(&self, prompt: &str) -> std::result::Result<String, GenerationFailure> {
        self.chat(prompt).await.map_err(GenerationFailure::from)
    }
}

/// Collects the assistant text from a single JSON body or NDJSON stream.
fn parse_chat_body(body: &str) -> Result<String> {
    let mut full_content = String::new();
    let mut parsed_any = false;

    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(line) {
            parsed_any = true;
            full_content.push_str(&chat_resp.message.content);
            if chat_resp.done {
                break;
            }
        }
    }

    if !parsed_any {
        if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(body) {
            full_content = chat_resp.message.content;
            parsed_any = true;
        }
    }

    if !parsed_any {
        return Err(anyhow::anyhow!("Unexpected response from Ollama"));
    }

    let story = full_content.trim();
    if story.is_empty() {
        return Err(anyhow::anyhow!("The model returned an empty story"));
    }
    Ok(story.to_string())
}

fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
