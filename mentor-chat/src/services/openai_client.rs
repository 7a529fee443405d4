//! OpenAI-compatible generative provider client
//!
//! One HTTP client implements all five capability contracts against an
//! OpenAI-compatible REST endpoint (chat completions, image generation,
//! speech). The base URL is configurable so any compatible provider works.
//!
//! Structured responses (classification, mind map) are requested as JSON
//! and schema-validated; anything malformed is a ParseError, never a
//! partial result.

use async_trait::async_trait;
use mentor_common::db::models::MindMap;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::capability::{
    Capabilities, CapabilityError, Classification, Classifier, SpeechSynthesizer, TitleGenerator,
    TutorResponder, VisualGenerator,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const USER_AGENT: &str = "Mentor/0.1.0 (https://github.com/mentor/mentor)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const CHAT_MODEL: &str = "gpt-4o-mini";
const IMAGE_MODEL: &str = "dall-e-3";
const SPEECH_MODEL: &str = "tts-1";
const SPEECH_VOICE: &str = "alloy";

/// Chat completions response (simplified)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Image generation response (simplified)
#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

/// OpenAI-compatible API client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, CapabilityError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CapabilityError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        })
    }

    /// Expose one shared client behind all five capability contracts
    pub fn capabilities(self: std::sync::Arc<Self>) -> Capabilities {
        Capabilities {
            classifier: Some(self.clone()),
            title_generator: Some(self.clone()),
            tutor: Some(self.clone()),
            visuals: Some(self.clone()),
            speech: Some(self),
        }
    }

    /// Run a chat completion and return the assistant text
    async fn chat(
        &self,
        system_prompt: &str,
        user_text: &str,
        json_mode: bool,
    ) -> Result<String, CapabilityError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": CHAT_MODEL,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_text},
            ],
        });
        if json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }

        tracing::debug!(url = %url, json_mode, "Querying chat completions");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CapabilityError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapabilityError::ApiError(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CapabilityError::ParseError("Empty completion".to_string()))
    }
}

/// Extract the outermost JSON object from model output.
///
/// Providers occasionally wrap JSON in markdown fences or prose despite
/// JSON mode; slicing first `{` to last `}` recovers those responses.
pub(crate) fn extract_json_object(text: &str) -> Result<&str, CapabilityError> {
    let start = text
        .find('{')
        .ok_or_else(|| CapabilityError::ParseError("No JSON object in response".to_string()))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| CapabilityError::ParseError("Unterminated JSON object".to_string()))?;
    if end < start {
        return Err(CapabilityError::ParseError(
            "Malformed JSON object in response".to_string(),
        ));
    }
    Ok(&text[start..=end])
}

#[async_trait]
impl Classifier for OpenAiClient {
    async fn classify(&self, text: &str) -> Result<Classification, CapabilityError> {
        let system = "You classify a student's message into an educational subject. \
                      Respond with a JSON object: {\"subject\": string, \"category\": string, \
                      \"icon\": single emoji string, \"confidence\": number between 0 and 1}.";

        let raw = self.chat(system, text, true).await?;
        let classification: Classification = serde_json::from_str(extract_json_object(&raw)?)
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        if classification.subject.trim().is_empty() {
            return Err(CapabilityError::ParseError("Empty subject".to_string()));
        }
        if !(0.0..=1.0).contains(&classification.confidence) {
            return Err(CapabilityError::ParseError(format!(
                "Confidence out of range: {}",
                classification.confidence
            )));
        }

        tracing::debug!(
            subject = %classification.subject,
            confidence = classification.confidence,
            "Classified message"
        );

        Ok(classification)
    }
}

#[async_trait]
impl TitleGenerator for OpenAiClient {
    async fn title_for(&self, text: &str) -> Result<String, CapabilityError> {
        let system = "Generate a short title (5 words maximum) for a tutoring conversation \
                      that starts with the following message. Reply with the title only, \
                      no quotes.";

        let raw = self.chat(system, text, false).await?;
        let title = raw.trim().trim_matches('"').trim();
        if title.is_empty() {
            return Err(CapabilityError::ParseError("Empty title".to_string()));
        }

        // Enforce the five-word bound even when the model ignores it
        let title: Vec<&str> = title.split_whitespace().take(5).collect();
        Ok(title.join(" "))
    }
}

#[async_trait]
impl TutorResponder for OpenAiClient {
    async fn respond(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, CapabilityError> {
        self.chat(system_prompt, user_text, false).await
    }
}

#[async_trait]
impl VisualGenerator for OpenAiClient {
    async fn image(&self, prompt: &str) -> Result<String, CapabilityError> {
        let url = format!("{}/images/generations", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": IMAGE_MODEL,
                "prompt": prompt,
                "n": 1,
                "size": "1024x1024",
            }))
            .send()
            .await
            .map_err(|e| CapabilityError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapabilityError::ApiError(status.as_u16(), error_text));
        }

        let image: ImageResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        image
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| CapabilityError::ParseError("No image URL in response".to_string()))
    }

    async fn mind_map(&self, prompt: &str) -> Result<MindMap, CapabilityError> {
        let system = "Create a study mind map for the given topic. Respond with a JSON \
                      object: {\"centralTopic\": string, \"branches\": [{\"label\": string, \
                      \"children\": [string]}]}. Use 3-5 branches with 2-4 children each.";

        let raw = self.chat(system, prompt, true).await?;
        let map: MindMap = serde_json::from_str(extract_json_object(&raw)?)
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        if map.central_topic.trim().is_empty() {
            return Err(CapabilityError::ParseError("Empty central topic".to_string()));
        }
        if map.branches.is_empty() {
            return Err(CapabilityError::ParseError("Mind map has no branches".to_string()));
        }

        Ok(map)
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, CapabilityError> {
        let url = format!("{}/audio/speech", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": SPEECH_MODEL,
                "input": text,
                "voice": SPEECH_VOICE,
            }))
            .send()
            .await
            .map_err(|e| CapabilityError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapabilityError::ApiError(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CapabilityError::NetworkError(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new("sk-test".to_string(), None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_extract_json_object_plain() {
        let raw = r#"{"subject": "Biology"}"#;
        assert_eq!(extract_json_object(raw).unwrap(), raw);
    }

    #[test]
    fn test_extract_json_object_fenced() {
        let raw = "```json\n{\"subject\": \"Biology\"}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), r#"{"subject": "Biology"}"#);
    }

    #[test]
    fn test_extract_json_object_missing() {
        assert!(extract_json_object("no json here").is_err());
    }
}
