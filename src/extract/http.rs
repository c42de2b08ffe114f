//! A `TopicExtractor` backed by an OpenAI-compatible chat-completions API.

use super::{parse_extraction, TopicExtraction, TopicExtractor};
use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Asks a chat model for the topics and keywords of a prompt.
///
/// The defaults target the DeepSeek API; any endpoint that speaks the
/// `/chat/completions` protocol works. The request timeout comes from
/// [`ExtractorConfig::timeout`].
#[derive(Debug, Clone)]
pub struct ChatExtractor {
  client: reqwest::Client,
  config: ExtractorConfig,
}

impl ChatExtractor {
  pub fn new(config: ExtractorConfig) -> Result<Self, ExtractionError> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| ExtractionError::Request(e.to_string()))?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ExtractorConfig {
    &self.config
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

fn analysis_prompt(text: &str) -> String {
  format!(
    "Analyze this user prompt about a problem they're facing during Ramadan and extract:\n\
     1. Main topics/themes (e.g., patience, forgiveness, guidance, family, health, faith, wealth, relationships, etc.)\n\
     2. Key emotional state or sentiment\n\
     3. A concise summary of their problem\n\
     4. Keywords that can help find relevant Quran verses or hadiths\n\n\
     User prompt: \"{text}\"\n\n\
     Return as JSON with keys: topics (list), keywords (list), emotion (string), summary (string)"
  )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  temperature: f32,
  max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
  content: String,
}

#[async_trait]
impl TopicExtractor for ChatExtractor {
  async fn extract(&self, text: &str) -> Result<TopicExtraction, ExtractionError> {
    let req = ChatRequest {
      model: &self.config.model,
      messages: vec![ChatMessage {
        role: "user",
        content: analysis_prompt(text),
      }],
      temperature: self.config.temperature,
      max_tokens: self.config.max_tokens,
    };

    let mut request = self.client.post(self.url()).json(&req);
    if let Some(key) = &self.config.api_key {
      request = request.bearer_auth(key);
    }

    let resp = request.send().await.map_err(|e| {
      if e.is_timeout() {
        ExtractionError::Timeout(self.config.timeout())
      } else {
        ExtractionError::Request(e.to_string())
      }
    })?;

    if !resp.status().is_success() {
      let status = resp.status().as_u16();
      let body = resp.text().await.unwrap_or_default();
      return Err(ExtractionError::Status { status, body });
    }

    let body: ChatResponse = resp
      .json()
      .await
      .map_err(|e| ExtractionError::MalformedOutput(e.to_string()))?;

    let content = body
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or_else(|| ExtractionError::MalformedOutput("response has no choices".to_string()))?;

    parse_extraction(&content)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_url_joins_base() {
    let extractor = ChatExtractor::new(ExtractorConfig {
      base_url: "http://localhost:8080/v1/".to_string(),
      ..Default::default()
    })
    .unwrap();
    assert_eq!(extractor.url(), "http://localhost:8080/v1/chat/completions");
  }

  #[test]
  fn test_prompt_embeds_text() {
    let prompt = analysis_prompt("I lost my job");
    assert!(prompt.contains("User prompt: \"I lost my job\""));
    assert!(prompt.contains("topics (list), keywords (list)"));
  }

  #[tokio::test]
  async fn test_unreachable_endpoint_is_request_error() {
    let extractor = ChatExtractor::new(ExtractorConfig {
      base_url: "http://127.0.0.1:9".to_string(),
      timeout_secs: 2,
      ..Default::default()
    })
    .unwrap();
    let err = extractor.extract("patience").await.unwrap_err();
    assert!(matches!(err, ExtractionError::Request(_) | ExtractionError::Timeout(_)));
  }
}
