//! End-to-end pipeline: raw text → structured record → LaTeX → PDF.
//!
//! Flow: parse (AI primary / heuristic fallback) → validate → optional
//! job-tailoring → synthesize → compile with retry.
//!
//! Compilation exhaustion is a soft failure: the caller always gets the
//! record and the .tex artifact back, with `pdf_generated` flagging whether
//! a binary artifact exists. Only validation rejects hard.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::EngineError;
use crate::latex::synthesize;
use crate::models::StructuredRecord;
use crate::parser::gemini::GeminiClient;
use crate::parser::parse_resume_text;
use crate::render::retry::{compile_with_retry, RetryPolicy};
use crate::render::Renderer;
use crate::tailor::tailor_for_job;

/// Generation mode; selects the artifact-name suffix and whether the
/// job-tailoring step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Professional,
    Tailored,
}

impl Mode {
    fn suffix(&self) -> &'static str {
        match self {
            Mode::Professional => "_professional",
            Mode::Tailored => "_tailored",
        }
    }
}

/// Deterministic artifact stem for a caller-supplied base identifier.
pub fn artifact_stem(base_id: &str, mode: Mode) -> String {
    format!("{base_id}{}_resume", mode.suffix())
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub record: StructuredRecord,
    pub latex_path: PathBuf,
    /// Present only when a binary artifact was produced and accepted.
    pub pdf_path: Option<PathBuf>,
    pub pdf_generated: bool,
}

/// Runs the full pipeline from raw extracted text.
pub async fn run(
    config: &Config,
    renderer: &dyn Renderer,
    raw_text: &str,
    mode: Mode,
    job_description: Option<&str>,
    base_id: &str,
) -> Result<PipelineOutcome, EngineError> {
    let gemini = config
        .gemini_api_key
        .as_ref()
        .map(|key| GeminiClient::new(key.clone()));

    let record = parse_resume_text(gemini.as_ref(), raw_text).await;
    run_record(config, renderer, record, mode, job_description, base_id).await
}

/// Runs the pipeline from an already-structured record (for callers that
/// edited or stored one).
pub async fn run_record(
    config: &Config,
    renderer: &dyn Renderer,
    record: StructuredRecord,
    mode: Mode,
    job_description: Option<&str>,
    base_id: &str,
) -> Result<PipelineOutcome, EngineError> {
    validate_record(&record)?;

    let record = match (mode, job_description) {
        (Mode::Tailored, Some(jd)) if !jd.trim().is_empty() => {
            let gemini = config
                .gemini_api_key
                .as_ref()
                .map(|key| GeminiClient::new(key.clone()));
            tailor_for_job(gemini.as_ref(), &record, jd).await
        }
        (Mode::Tailored, _) => {
            warn!("Tailored mode requested without a job description, skipping tailoring");
            record
        }
        (Mode::Professional, _) => record,
    };

    let document = synthesize(&record);
    let stem = artifact_stem(base_id, mode);

    std::fs::create_dir_all(&config.output_dir)?;
    let latex_path = config.output_dir.join(format!("{stem}.tex"));
    std::fs::write(&latex_path, &document)?;
    info!(
        "LaTeX source written to {latex_path:?} ({} bytes)",
        document.len()
    );

    let pdf_path = config.output_dir.join(format!("{stem}.pdf"));
    let pdf_generated =
        compile_with_retry(renderer, &document, &pdf_path, &RetryPolicy::default()).await;
    if !pdf_generated {
        warn!("PDF generation failed for {base_id}, returning LaTeX source only");
    }

    Ok(PipelineOutcome {
        record,
        latex_path,
        pdf_path: pdf_generated.then_some(pdf_path),
        pdf_generated,
    })
}

/// Rejects records with nothing to typeset an identity from. The reason
/// names the missing fields so callers can relay it.
pub fn validate_record(record: &StructuredRecord) -> Result<(), EngineError> {
    if record.name.is_none() && record.email.is_none() && record.phone.is_none() {
        let missing: Vec<&str> = [
            ("name", record.name.is_none()),
            ("email", record.email.is_none()),
            ("phone", record.phone.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(field, _)| *field)
        .collect();
        return Err(EngineError::Validation(format!(
            "no identity fields could be extracted (missing: {})",
            missing.join(", ")
        )));
    }
    Ok(())
}
