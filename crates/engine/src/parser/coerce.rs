//! Permissive coercion from a schema-free JSON tree into `StructuredRecord`.
//!
//! The remote model is instructed to follow the extraction schema but is not
//! trusted to: fields arrive as strings or numbers, lists arrive as single
//! strings, objects carry extra keys, whole sections go missing. Everything
//! here degrades to "absent" rather than erroring: a malformed field is a
//! lost field, never a failed parse.

use serde_json::Value;

use crate::models::{
    CertificationEntry, CustomSection, EducationEntry, ExperienceEntry, ProjectEntry, Skills,
    StructuredRecord,
};

/// Builds a record from an arbitrary JSON value. Unknown keys are ignored;
/// the caller is expected to `prune()` the result.
pub fn record_from_value(value: &Value) -> StructuredRecord {
    StructuredRecord {
        name: text(value, "name"),
        email: text(value, "email"),
        phone: text(value, "phone"),
        linkedin: text(value, "linkedin"),
        github: text(value, "github"),
        website: text(value, "website"),
        address: text(value, "address"),
        summary: text(value, "summary"),
        education: entries(value, "education", education_from_value),
        experience: entries(value, "experience", experience_from_value),
        projects: entries(value, "projects", project_from_value),
        skills: skills_from_value(value.get("skills")),
        certifications: entries(value, "certifications", certification_from_value),
        awards: text_list(value.get("awards")),
        languages: text_list(value.get("languages")),
        custom_sections: entries(value, "custom_sections", custom_section_from_value),
    }
}

fn education_from_value(v: &Value) -> EducationEntry {
    EducationEntry {
        degree: text(v, "degree"),
        institution: text(v, "institution"),
        date: text(v, "date"),
        location: text(v, "location"),
        gpa: text(v, "gpa"),
        details: text(v, "details"),
    }
}

fn experience_from_value(v: &Value) -> ExperienceEntry {
    ExperienceEntry {
        title: text(v, "title"),
        company: text(v, "company"),
        date: text(v, "date"),
        location: text(v, "location"),
        description: text_list(v.get("description")),
    }
}

fn project_from_value(v: &Value) -> ProjectEntry {
    ProjectEntry {
        title: text(v, "title"),
        description: text_list(v.get("description")),
        technologies: text(v, "technologies"),
        date: text(v, "date"),
        link: text(v, "link"),
    }
}

fn certification_from_value(v: &Value) -> CertificationEntry {
    CertificationEntry {
        name: text(v, "name"),
        issuer: text(v, "issuer"),
        date: text(v, "date"),
    }
}

fn custom_section_from_value(v: &Value) -> CustomSection {
    CustomSection {
        title: text(v, "title"),
        // Content may itself arrive as a list of lines.
        content: text_list(v.get("content")).join("\n"),
    }
}

fn skills_from_value(value: Option<&Value>) -> Skills {
    let Some(value) = value else {
        return Skills::default();
    };
    Skills {
        languages: text_list(value.get("languages")),
        frameworks: text_list(value.get("frameworks")),
        tools: text_list(value.get("tools")),
        libraries: text_list(value.get("libraries")),
        databases: text_list(value.get("databases")),
        other: text_list(value.get("other")),
    }
}

/// A scalar field: accepts a string or a number, rejects everything else.
fn text(value: &Value, key: &str) -> Option<String> {
    as_text(value.get(key)?)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A list field: accepts an array of scalars (non-scalar elements dropped)
/// or a single scalar promoted to a one-element list.
fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        Some(other) => as_text(other).map(|s| vec![s]).unwrap_or_default(),
        None => Vec::new(),
    }
}

/// An array of objects: non-object elements are dropped.
fn entries<T>(value: &Value, key: &str, build: fn(&Value) -> T) -> Vec<T> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).map(build).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_schema_round_trips() {
        let value = json!({
            "name": "Jane Doe",
            "email": "jane@x.com",
            "education": [{"degree": "BSc", "institution": "MIT", "date": "2020"}],
            "experience": [{"title": "Engineer", "company": "Initech",
                            "description": ["Shipped a thing", "Fixed a thing"]}],
            "skills": {"languages": ["Rust", "Go"], "tools": ["Git"]},
            "awards": ["Dean's List"]
        });
        let record = record_from_value(&value);

        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.education[0].institution.as_deref(), Some("MIT"));
        assert_eq!(record.experience[0].description.len(), 2);
        assert_eq!(record.skills.languages, vec!["Rust", "Go"]);
        assert_eq!(record.awards, vec!["Dean's List"]);
    }

    #[test]
    fn test_numbers_coerce_to_strings() {
        let value = json!({"education": [{"degree": "BSc", "gpa": 3.8, "date": 2020}]});
        let record = record_from_value(&value);
        assert_eq!(record.education[0].gpa.as_deref(), Some("3.8"));
        assert_eq!(record.education[0].date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_single_string_promotes_to_list() {
        let value = json!({
            "experience": [{"title": "Engineer", "description": "Did one thing"}],
            "awards": "Employee of the month"
        });
        let record = record_from_value(&value);
        assert_eq!(record.experience[0].description, vec!["Did one thing"]);
        assert_eq!(record.awards, vec!["Employee of the month"]);
    }

    #[test]
    fn test_malformed_fields_degrade_to_absent() {
        let value = json!({
            "name": {"first": "Jane"},
            "education": "not a list",
            "skills": ["also", "wrong"],
            "experience": [{"title": "Engineer"}, "stray string"]
        });
        let record = record_from_value(&value);
        assert!(record.name.is_none());
        assert!(record.education.is_empty());
        assert!(record.skills.is_empty());
        assert_eq!(record.experience.len(), 1, "non-object entries are dropped");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let value = json!({"name": "Jane", "confidence": 0.93, "notes": ["x"]});
        let record = record_from_value(&value);
        assert_eq!(record.name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_custom_section_content_joins_line_lists() {
        let value = json!({
            "custom_sections": [{"title": "Volunteering", "content": ["Line one", "Line two"]}]
        });
        let record = record_from_value(&value);
        assert_eq!(record.custom_sections[0].content, "Line one\nLine two");
    }
}
