//! Resume text parsing: AI-assisted primary path with a deterministic
//! heuristic fallback.
//!
//! The contract for callers is simple: `parse_resume_text` always produces a
//! record. Extraction unavailability (no credential, network failure,
//! malformed response, non-2xx status, or an AI result with no usable data)
//! is recovered here by falling back, never surfaced as an error.

pub mod coerce;
pub mod gemini;
pub mod heuristic;
pub mod prompts;

use tracing::{info, warn};

use crate::models::StructuredRecord;
use crate::parser::gemini::GeminiClient;

/// Parses raw extracted text into a `StructuredRecord`.
///
/// Tries the Gemini extraction first when a client is configured; any
/// failure, or an empty extraction result, degrades to the heuristic parser.
pub async fn parse_resume_text(
    gemini: Option<&GeminiClient>,
    raw_text: &str,
) -> StructuredRecord {
    if let Some(client) = gemini {
        match client.extract_record(raw_text).await {
            Ok(record) if !record.is_empty() => {
                info!("AI extraction succeeded");
                return record;
            }
            Ok(_) => warn!("AI extraction returned an empty record, using fallback parsing"),
            Err(e) => warn!("AI extraction unavailable ({e}), using fallback parsing"),
        }
    } else {
        info!("No AI credential configured, using fallback parsing");
    }

    heuristic::parse(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_client_falls_back_to_heuristic() {
        let record = parse_resume_text(None, "Jane Doe\njane@x.com").await;
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane@x.com"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back_to_heuristic() {
        // Point at a closed local port: the HTTP error must be swallowed and
        // the heuristic result returned.
        let client = GeminiClient::with_base_url(
            "test-key".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        let record = parse_resume_text(Some(&client), "Jane Doe\njane@x.com").await;
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
    }
}
