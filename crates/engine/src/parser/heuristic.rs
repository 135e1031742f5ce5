//! Heuristic fallback parser.
//!
//! Deterministic, rule-based extraction used whenever the AI path is
//! unavailable or fails. Intentionally best-effort and lossy: single-pass
//! line scanning, first-match-wins contact extraction, keyword-driven
//! section segmentation. It never fails; the worst case is an empty record.
//!
//! The section state lives in an explicit enum-tagged accumulator rather
//! than ambient mutable state, so each section's rules are testable in
//! isolation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{EducationEntry, ExperienceEntry, ProjectEntry, StructuredRecord};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// North-American phone numbers: optional +1, separators, optional area
/// parentheses.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})")
        .expect("valid phone regex")
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

const EDUCATION_KEYWORDS: &[&str] = &["education", "academic"];
const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "work", "employment", "professional"];
const PROJECT_KEYWORDS: &[&str] = &["project", "portfolio"];
const SKILL_KEYWORDS: &[&str] = &["skill", "technical", "programming", "languages"];
const DEGREE_KEYWORDS: &[&str] = &["bachelor", "master", "phd", "associate", "certificate"];

/// Which section of the document the line scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Education,
    Experience,
    Projects,
    Skills,
}

/// A partially-built entry, tagged with the section it belongs to so a
/// section switch can flush it into the right list.
#[derive(Debug)]
enum Pending {
    Education(EducationEntry),
    Experience(ExperienceEntry),
    Project(ProjectEntry),
}

/// Line-scanning state: the active section plus at most one pending entry.
#[derive(Debug)]
struct Accumulator {
    section: Section,
    pending: Option<Pending>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            section: Section::None,
            pending: None,
        }
    }

    /// Flushes any pending entry into its own section's list.
    fn flush(&mut self, record: &mut StructuredRecord) {
        match self.pending.take() {
            Some(Pending::Education(e)) => record.education.push(e),
            Some(Pending::Experience(e)) => record.experience.push(e),
            Some(Pending::Project(p)) => record.projects.push(p),
            None => {}
        }
    }

    fn enter_section(&mut self, section: Section, record: &mut StructuredRecord) {
        self.flush(record);
        self.section = section;
    }
}

/// Parses raw CV text into a best-effort `StructuredRecord`.
pub fn parse(text: &str) -> StructuredRecord {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut record = StructuredRecord::default();
    extract_contacts(&lines, &mut record);
    extract_name(&lines, &mut record);
    extract_sections(&lines, &mut record);
    record.prune();
    record
}

/// Scans every line independently; the first match per field wins and later
/// matches are ignored.
fn extract_contacts(lines: &[&str], record: &mut StructuredRecord) {
    for line in lines {
        let lower = line.to_lowercase();

        if record.email.is_none() {
            if let Some(m) = EMAIL_RE.find(line) {
                record.email = Some(m.as_str().to_string());
            }
        }

        if record.phone.is_none() {
            if let Some(m) = PHONE_RE.find(line) {
                record.phone = Some(m.as_str().to_string());
            }
        }

        if record.linkedin.is_none() && lower.contains("linkedin.com") {
            record.linkedin = Some(line.to_string());
        }

        if record.github.is_none() && lower.contains("github.com") {
            record.github = Some(line.to_string());
        }

        if record.website.is_none()
            && (lower.contains("http") || lower.contains("www."))
            && !lower.contains("linkedin")
            && !lower.contains("github")
        {
            record.website = Some(line.to_string());
        }
    }
}

/// The name is usually the first short line near the top that is not a
/// contact line: no `@`/parentheses, at most 4 words, longer than 2 chars.
fn extract_name(lines: &[&str], record: &mut StructuredRecord) {
    if record.name.is_some() {
        return;
    }
    for line in lines.iter().take(5) {
        if !line.contains(['@', '(', ')'])
            && line.split_whitespace().count() <= 4
            && line.len() > 2
        {
            record.name = Some(line.to_string());
            break;
        }
    }
}

fn detect_section(line_lower: &str) -> Option<Section> {
    let matches_any = |keywords: &[&str]| keywords.iter().any(|k| line_lower.contains(k));
    if matches_any(EDUCATION_KEYWORDS) {
        Some(Section::Education)
    } else if matches_any(EXPERIENCE_KEYWORDS) {
        Some(Section::Experience)
    } else if matches_any(PROJECT_KEYWORDS) {
        Some(Section::Projects)
    } else if matches_any(SKILL_KEYWORDS) {
        Some(Section::Skills)
    } else {
        None
    }
}

fn extract_sections(lines: &[&str], record: &mut StructuredRecord) {
    let mut acc = Accumulator::new();

    for line in lines {
        let line_lower = line.to_lowercase();

        // A keyword-matching line is consumed as a section header, never
        // treated as content.
        if let Some(section) = detect_section(&line_lower) {
            acc.enter_section(section, record);
            continue;
        }

        match acc.section {
            Section::None => {}
            Section::Education => education_line(line, &line_lower, &mut acc, record),
            Section::Experience => experience_line(line, &mut acc, record),
            Section::Projects => project_line(line, &mut acc, record),
            Section::Skills => skills_line(line, &line_lower, record),
        }
    }

    acc.flush(record);
}

/// A degree-keyword line starts a new entry; the next line fills the
/// institution, then the first line with a 4-digit year fills the date.
fn education_line(
    line: &str,
    line_lower: &str,
    acc: &mut Accumulator,
    record: &mut StructuredRecord,
) {
    if DEGREE_KEYWORDS.iter().any(|k| line_lower.contains(k)) {
        acc.flush(record);
        acc.pending = Some(Pending::Education(EducationEntry {
            degree: Some(line.to_string()),
            ..Default::default()
        }));
        return;
    }

    if let Some(Pending::Education(entry)) = acc.pending.as_mut() {
        if entry.institution.is_none() {
            entry.institution = Some(line.to_string());
        } else if entry.date.is_none() && YEAR_RE.is_match(line) {
            entry.date = Some(line.to_string());
        }
    }
}

/// A line containing a dash, a pipe, or a 4-digit year reads as a role
/// heading and starts a new entry; subsequent lines become bullets in order.
fn experience_line(line: &str, acc: &mut Accumulator, record: &mut StructuredRecord) {
    if line.contains(['-', '|']) || YEAR_RE.is_match(line) {
        acc.flush(record);
        acc.pending = Some(Pending::Experience(ExperienceEntry {
            title: Some(line.to_string()),
            ..Default::default()
        }));
        return;
    }

    if let Some(Pending::Experience(entry)) = acc.pending.as_mut() {
        entry.description.push(line.to_string());
    }
}

/// Single-line heuristic: every content line is its own project.
fn project_line(line: &str, acc: &mut Accumulator, record: &mut StructuredRecord) {
    acc.flush(record);
    acc.pending = Some(Pending::Project(ProjectEntry {
        title: Some(line.to_string()),
        ..Default::default()
    }));
}

/// Classifies a skills line by keyword and splits it on commas, stripping an
/// optional leading `label:` prefix. Assignment overwrites the category.
fn skills_line(line: &str, line_lower: &str, record: &mut StructuredRecord) {
    let items = split_skill_items(line);
    if items.is_empty() {
        return;
    }

    if line_lower.contains("language") || line_lower.contains("programming") {
        record.skills.languages = items;
    } else if line_lower.contains("framework") {
        record.skills.frameworks = items;
    } else if line_lower.contains("tool") || line_lower.contains("software") {
        record.skills.tools = items;
    }
}

fn split_skill_items(line: &str) -> Vec<String> {
    let text = match line.rsplit_once(':') {
        Some((_, rest)) => rest,
        None => line,
    };
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crafted_fixture_extracts_all_documented_fields() {
        let text = "Jane Doe\njane@x.com\n555-123-4567\nEducation\nBachelor of Science\nMIT\n2020";
        let record = parse(text);

        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane@x.com"));
        assert_eq!(record.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(record.education.len(), 1);
        let edu = &record.education[0];
        assert_eq!(edu.degree.as_deref(), Some("Bachelor of Science"));
        assert_eq!(edu.institution.as_deref(), Some("MIT"));
        assert_eq!(edu.date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
    }

    #[test]
    fn test_first_contact_match_wins() {
        let text = "first@a.com\nsecond@b.com\n(555) 111-2222\n555.333.4444";
        let record = parse(text);
        assert_eq!(record.email.as_deref(), Some("first@a.com"));
        assert_eq!(record.phone.as_deref(), Some("(555) 111-2222"));
    }

    #[test]
    fn test_profile_urls_are_classified() {
        let text = "Jane Doe\nlinkedin.com/in/janedoe\ngithub.com/janedoe\nhttps://janedoe.dev";
        let record = parse(text);
        assert_eq!(record.linkedin.as_deref(), Some("linkedin.com/in/janedoe"));
        assert_eq!(record.github.as_deref(), Some("github.com/janedoe"));
        assert_eq!(record.website.as_deref(), Some("https://janedoe.dev"));
    }

    #[test]
    fn test_name_skips_contact_lines() {
        let text = "jane@x.com\n(555) 123-4567\nJane Doe";
        let record = parse(text);
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_name_rejects_long_lines() {
        let text = "An Extremely Long Headline About Professional Goals\nJane Doe";
        let record = parse(text);
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_section_header_is_consumed_not_treated_as_content() {
        let text = "Jane Doe\nProjects\nCompiler playground";
        let record = parse(text);
        assert_eq!(record.projects.len(), 1);
        assert_eq!(
            record.projects[0].title.as_deref(),
            Some("Compiler playground")
        );
    }

    #[test]
    fn test_experience_heading_starts_entry_and_lines_become_bullets() {
        let text = "Jane Doe\nExperience\nSoftware Engineer - Initech | 2019\nShipped the widget service\nReduced build times";
        let record = parse(text);
        assert_eq!(record.experience.len(), 1);
        let exp = &record.experience[0];
        assert_eq!(
            exp.title.as_deref(),
            Some("Software Engineer - Initech | 2019")
        );
        assert_eq!(exp.description.len(), 2);
        assert_eq!(exp.description[0], "Shipped the widget service");
    }

    #[test]
    fn test_year_line_starts_new_experience_entry() {
        let text = "Experience\nEngineer at Initech 2019\nDid things\nAnalyst at Globex 2017\nDid other things";
        let record = parse(text);
        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[1].description, vec!["Did other things"]);
    }

    #[test]
    fn test_each_project_line_is_its_own_entry() {
        let text = "Projects\nRay tracer\nChat server\nStatic site generator";
        let record = parse(text);
        assert_eq!(record.projects.len(), 3);
    }

    #[test]
    fn test_skills_lines_split_on_commas_and_strip_label() {
        let text = "Skills\nLanguage: Rust, Go, Python\nFrameworks: Axum, Actix\nTools: Docker, Git";
        let record = parse(text);
        assert_eq!(record.skills.languages, vec!["Rust", "Go", "Python"]);
        assert_eq!(record.skills.frameworks, vec!["Axum", "Actix"]);
        assert_eq!(record.skills.tools, vec!["Docker", "Git"]);
    }

    #[test]
    fn test_skills_assignment_overwrites_category() {
        let text = "Skills\nLanguage: Rust\nLanguage: Go, Python";
        let record = parse(text);
        assert_eq!(record.skills.languages, vec!["Go", "Python"]);
    }

    #[test]
    fn test_plural_languages_label_reads_as_section_header() {
        // "Languages: ..." matches the skills section keyword set, so the
        // line is consumed as a header and never populates a category. The
        // fallback is lossy by design here.
        let text = "Skills\nLanguages: Rust, Go";
        let record = parse(text);
        assert!(record.skills.languages.is_empty());
    }

    #[test]
    fn test_pending_entry_flushes_at_section_switch() {
        // The education entry is still pending when the Experience header
        // appears; it must land in `education`, not leak into `experience`.
        let text = "Education\nBachelor of Arts\nState College\nExperience\nEngineer - Initech";
        let record = parse(text);
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.experience.len(), 1);
        assert_eq!(
            record.education[0].institution.as_deref(),
            Some("State College")
        );
    }

    #[test]
    fn test_pending_entry_flushes_at_end_of_input() {
        let text = "Education\nMaster of Science\nTech University";
        let record = parse(text);
        assert_eq!(record.education.len(), 1);
    }

    #[test]
    fn test_phone_with_country_code() {
        let text = "Jane Doe\n+1 555 123 4567";
        let record = parse(text);
        assert_eq!(record.phone.as_deref(), Some("+1 555 123 4567"));
    }
}
