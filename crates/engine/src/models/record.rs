//! StructuredRecord, the canonical parsed-CV representation.
//!
//! A record is created fresh per parse, optionally mutated once by the
//! job-tailoring step, and consumed once by the synthesizer. It carries no
//! identity beyond a single call.
//!
//! Invariant: every field present in a pruned record contains at least one
//! non-empty value. Synthesis never emits a section for an absent field, so
//! placeholder data must never survive `prune()`.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<EducationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<ProjectEntry>,
    #[serde(default, skip_serializing_if = "Skills::is_empty")]
    pub skills: Skills,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<CertificationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Ordered bullet points. The synthesizer caps these at 4 per role.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Remote parsers emit this as either a string or a list of strings;
    /// both are accepted and joined before synthesis.
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub description: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Skill categories. The category set is fixed; a category is omitted from
/// serialized output (and from synthesis) when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
            && self.frameworks.is_empty()
            && self.tools.is_empty()
            && self.libraries.is_empty()
            && self.databases.is_empty()
            && self.other.is_empty()
    }

    fn prune(&mut self) {
        for list in [
            &mut self.languages,
            &mut self.frameworks,
            &mut self.tools,
            &mut self.libraries,
            &mut self.databases,
            &mut self.other,
        ] {
            prune_strings(list);
        }
    }
}

impl StructuredRecord {
    /// Strips every empty string, empty list, and empty entry so the record
    /// satisfies the "no placeholders" invariant. Idempotent.
    pub fn prune(&mut self) {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.phone,
            &mut self.linkedin,
            &mut self.github,
            &mut self.website,
            &mut self.address,
            &mut self.summary,
        ] {
            prune_scalar(field);
        }

        for edu in &mut self.education {
            for field in [
                &mut edu.degree,
                &mut edu.institution,
                &mut edu.date,
                &mut edu.location,
                &mut edu.gpa,
                &mut edu.details,
            ] {
                prune_scalar(field);
            }
        }
        self.education.retain(|e| *e != EducationEntry::default());

        for exp in &mut self.experience {
            for field in [
                &mut exp.title,
                &mut exp.company,
                &mut exp.date,
                &mut exp.location,
            ] {
                prune_scalar(field);
            }
            prune_strings(&mut exp.description);
        }
        self.experience.retain(|e| *e != ExperienceEntry::default());

        for proj in &mut self.projects {
            for field in [
                &mut proj.title,
                &mut proj.technologies,
                &mut proj.date,
                &mut proj.link,
            ] {
                prune_scalar(field);
            }
            prune_strings(&mut proj.description);
        }
        self.projects.retain(|p| *p != ProjectEntry::default());

        self.skills.prune();

        for cert in &mut self.certifications {
            for field in [&mut cert.name, &mut cert.issuer, &mut cert.date] {
                prune_scalar(field);
            }
        }
        self.certifications
            .retain(|c| *c != CertificationEntry::default());

        prune_strings(&mut self.awards);
        prune_strings(&mut self.languages);

        for section in &mut self.custom_sections {
            prune_scalar(&mut section.title);
            section.content = section.content.trim().to_string();
        }
        self.custom_sections
            .retain(|s| s.title.is_some() || !s.content.is_empty());
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        *self == StructuredRecord::default()
    }
}

fn prune_scalar(field: &mut Option<String>) {
    if let Some(s) = field {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            *field = None;
        } else if trimmed.len() != s.len() {
            *field = Some(trimmed.to_string());
        }
    }
}

fn prune_strings(list: &mut Vec<String>) {
    for s in list.iter_mut() {
        *s = s.trim().to_string();
    }
    list.retain(|s| !s.is_empty());
}

/// Accepts `"text"`, `["a", "b"]`, or null for a field declared as a list.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    match Option::<StringOrList>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(StringOrList::One(s)) => Ok(vec![s]),
        Some(StringOrList::Many(v)) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_removes_empty_scalars_and_lists() {
        let mut record = StructuredRecord {
            name: Some("  Jane Doe ".to_string()),
            email: Some("   ".to_string()),
            awards: vec!["Dean's List".to_string(), "".to_string()],
            education: vec![EducationEntry {
                degree: Some("".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        record.prune();

        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert!(record.email.is_none());
        assert_eq!(record.awards, vec!["Dean's List".to_string()]);
        assert!(record.education.is_empty(), "all-empty entry must be dropped");
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut record = StructuredRecord {
            name: Some(" Jane ".to_string()),
            languages: vec![" English ".to_string()],
            ..Default::default()
        };
        record.prune();
        let once = record.clone();
        record.prune();
        assert_eq!(record, once);
    }

    #[test]
    fn test_empty_record_is_empty() {
        let mut record = StructuredRecord {
            summary: Some("  ".to_string()),
            ..Default::default()
        };
        record.prune();
        assert!(record.is_empty());
    }

    #[test]
    fn test_project_description_accepts_string_or_list() {
        let as_string: ProjectEntry =
            serde_json::from_str(r#"{"title": "CLI", "description": "A tool"}"#).unwrap();
        assert_eq!(as_string.description, vec!["A tool".to_string()]);

        let as_list: ProjectEntry =
            serde_json::from_str(r#"{"title": "CLI", "description": ["A", "tool"]}"#).unwrap();
        assert_eq!(as_list.description.len(), 2);

        let as_null: ProjectEntry =
            serde_json::from_str(r#"{"title": "CLI", "description": null}"#).unwrap();
        assert!(as_null.description.is_empty());
    }

    #[test]
    fn test_serialized_record_omits_absent_fields() {
        let record = StructuredRecord {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1, "only `name` should serialize: {obj:?}");
        assert!(obj.contains_key("name"));
    }

    #[test]
    fn test_skills_category_omitted_when_empty() {
        let skills = Skills {
            languages: vec!["Rust".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&skills).unwrap();
        assert!(json.get("frameworks").is_none());
        assert!(json.get("languages").is_some());
    }
}
