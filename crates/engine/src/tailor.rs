//! Job-tailoring enhancement.
//!
//! Rewrites the descriptive prose of a parsed record to match a job
//! description, via the same Gemini wire contract as extraction. Factual
//! fields are not merely *asked* to stay unchanged: after coercing the
//! model's output, `restore_factual_fields` copies them back from the input
//! record, so the preservation contract holds regardless of model behavior.
//!
//! Any Gemini failure returns the input record unchanged: tailoring is an
//! enhancement, never a gate.

use tracing::{info, warn};

use crate::models::StructuredRecord;
use crate::parser::coerce::record_from_value;
use crate::parser::gemini::{extract_json_object, GeminiClient};
use crate::parser::prompts::TAILOR_PROMPT_TEMPLATE;

/// Returns a copy of `record` with descriptive text rewritten toward
/// `job_description`. Factual scalars are byte-identical to the input.
pub async fn tailor_for_job(
    gemini: Option<&GeminiClient>,
    record: &StructuredRecord,
    job_description: &str,
) -> StructuredRecord {
    let Some(client) = gemini else {
        info!("No AI credential configured, skipping job tailoring");
        return record.clone();
    };

    let cv_json = match serde_json::to_string_pretty(record) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize record for tailoring ({e}), keeping original");
            return record.clone();
        }
    };

    let prompt = TAILOR_PROMPT_TEMPLATE
        .replace("{cv_json}", &cv_json)
        .replace("{job_description}", job_description);

    let generated = match client.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Tailoring call unavailable ({e}), keeping original record");
            return record.clone();
        }
    };

    let Some(json_text) = extract_json_object(&generated) else {
        warn!("Tailoring response contained no JSON object, keeping original record");
        return record.clone();
    };
    let value: serde_json::Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => {
            warn!("Tailoring response was malformed JSON ({e}), keeping original record");
            return record.clone();
        }
    };

    let mut enhanced = record_from_value(&value);
    restore_factual_fields(record, &mut enhanced);
    enhanced.prune();
    enhanced
}

/// Overwrites every factual field of `enhanced` with the original's value.
///
/// Only descriptive prose may differ after this call: the summary, education
/// `details`, experience bullets, and project title/description/technologies.
/// Structural drift (added or dropped entries) resets the affected list to
/// the original.
fn restore_factual_fields(original: &StructuredRecord, enhanced: &mut StructuredRecord) {
    enhanced.name = original.name.clone();
    enhanced.email = original.email.clone();
    enhanced.phone = original.phone.clone();
    enhanced.linkedin = original.linkedin.clone();
    enhanced.github = original.github.clone();
    enhanced.website = original.website.clone();
    enhanced.address = original.address.clone();

    if enhanced.education.len() == original.education.len() {
        for (edu, orig) in enhanced.education.iter_mut().zip(&original.education) {
            edu.degree = orig.degree.clone();
            edu.institution = orig.institution.clone();
            edu.date = orig.date.clone();
            edu.location = orig.location.clone();
            edu.gpa = orig.gpa.clone();
        }
    } else {
        enhanced.education = original.education.clone();
    }

    if enhanced.experience.len() == original.experience.len() {
        for (exp, orig) in enhanced.experience.iter_mut().zip(&original.experience) {
            exp.title = orig.title.clone();
            exp.company = orig.company.clone();
            exp.date = orig.date.clone();
            exp.location = orig.location.clone();
            if exp.description.is_empty() {
                exp.description = orig.description.clone();
            }
        }
    } else {
        enhanced.experience = original.experience.clone();
    }

    if enhanced.projects.len() == original.projects.len() {
        for (proj, orig) in enhanced.projects.iter_mut().zip(&original.projects) {
            proj.date = orig.date.clone();
            proj.link = orig.link.clone();
        }
    } else {
        enhanced.projects = original.projects.clone();
    }

    // Certifications, awards, spoken languages, and custom sections carry no
    // descriptive prose worth rewriting.
    enhanced.certifications = original.certifications.clone();
    enhanced.awards = original.awards.clone();
    enhanced.languages = original.languages.clone();
    enhanced.custom_sections = original.custom_sections.clone();
}
