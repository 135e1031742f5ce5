//! Gemini client, the single point of entry for all generative-AI calls.
//!
//! Every failure mode here maps to a `ParseError`, and every caller treats
//! any `ParseError` as "fall back to the heuristic parser" (extraction) or
//! "return the input unchanged" (tailoring). Nothing in this module is
//! allowed to surface to the pipeline caller as a hard fault.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::StructuredRecord;
use crate::parser::coerce::record_from_value;
use crate::parser::prompts::EXTRACTION_PROMPT_TEMPLATE;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all extraction and tailoring calls.
pub const MODEL: &str = "gemini-2.0-flash";
/// Parsing calls block the whole pipeline, so they carry a hard timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response contained no generated text")]
    EmptyResponse,

    #[error("no JSON object found in generated text")]
    NoJsonObject,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Thin wrapper over the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Sends one prompt and returns the generated text of the first
    /// candidate part.
    pub async fn generate(&self, prompt: &str) -> Result<String, ParseError> {
        if self.api_key.is_empty() {
            return Err(ParseError::MissingCredential);
        }

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {status}: {message}");
            return Err(ParseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(ParseError::EmptyResponse)?;

        debug!("Gemini returned {} bytes of generated text", text.len());
        Ok(text)
    }

    /// Primary extraction path: prompts the model with the fixed schema and
    /// coerces whatever JSON comes back into a pruned `StructuredRecord`.
    pub async fn extract_record(&self, cv_text: &str) -> Result<StructuredRecord, ParseError> {
        let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{cv_text}", cv_text);
        let generated = self.generate(&prompt).await?;

        let json_text = extract_json_object(&generated).ok_or(ParseError::NoJsonObject)?;
        let value: serde_json::Value = serde_json::from_str(json_text)?;

        let mut record = record_from_value(&value);
        record.prune();
        Ok(record)
    }
}

#[cfg(test)]
impl GeminiClient {
    /// Test constructor pointing at a stub server instead of the live API.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let mut client = Self::new(api_key);
        client.base_url = base_url;
        client
    }
}

/// Locates the first `{` and the last `}` in generated text, tolerating
/// explanatory prose or code fences wrapping the JSON object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
