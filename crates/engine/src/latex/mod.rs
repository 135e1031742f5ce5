//! Document synthesizer: turns a `StructuredRecord` into a complete LaTeX
//! source document.
//!
//! Pure function of its input: no clock, no config, no I/O, so synthesizing
//! the same record twice yields byte-identical output. Sections are emitted
//! in a fixed order (identity → summary → education → experience → projects
//! → skills → certifications → awards → languages → custom) and only when
//! their data is non-empty. Every interpolated value passes through the
//! sanitizer; URLs get a default scheme when none is given.

pub mod preamble;

use crate::models::{CustomSection, ExperienceEntry, ProjectEntry, Skills, StructuredRecord};
use crate::sanitize::{latex_escape, latex_escape_all};

/// Experience bullet lists are truncated to this many entries per role.
pub const MAX_EXPERIENCE_BULLETS: usize = 4;

/// Synthesizes the full LaTeX document for a record.
pub fn synthesize(record: &StructuredRecord) -> String {
    let mut doc = String::with_capacity(8 * 1024);
    doc.push_str(preamble::PREAMBLE);

    emit_identity(&mut doc, record);
    emit_summary(&mut doc, record);
    emit_education(&mut doc, record);
    emit_experience(&mut doc, record);
    emit_projects(&mut doc, record);
    emit_skills(&mut doc, &record.skills);
    emit_certifications(&mut doc, record);
    emit_awards(&mut doc, record);
    emit_languages(&mut doc, record);
    emit_custom_sections(&mut doc, record);

    doc.push_str(preamble::POSTAMBLE);
    doc
}

/// Prefixes `https://` when the URL carries no scheme.
fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity block
// ────────────────────────────────────────────────────────────────────────────

/// The name is the only mandatory element: a placeholder label is used only
/// when it is literally absent. The contact line is assembled from
/// present-only fields, joined with ` $|$ `.
fn emit_identity(doc: &mut String, record: &StructuredRecord) {
    let name = record.name.as_deref().unwrap_or("Name Not Found");
    doc.push_str("\n%----------HEADING----------\n\\begin{center}\n");
    doc.push_str(&format!(
        "    \\textbf{{\\Huge {}}} \\\\ \\vspace{{1pt}}",
        latex_escape(name)
    ));

    let mut contact_parts: Vec<String> = Vec::new();
    if let Some(phone) = &record.phone {
        contact_parts.push(latex_escape(phone));
    }
    if let Some(email) = &record.email {
        let email = latex_escape(email);
        contact_parts.push(format!(
            "\\href{{mailto:{email}}}{{\\underline{{{email}}}}}"
        ));
    }
    if let Some(linkedin) = &record.linkedin {
        contact_parts.push(format!(
            "\\href{{{}}}{{\\underline{{LinkedIn}}}}",
            ensure_scheme(linkedin)
        ));
    }
    if let Some(github) = &record.github {
        contact_parts.push(format!(
            "\\href{{{}}}{{\\underline{{GitHub}}}}",
            ensure_scheme(github)
        ));
    }
    if let Some(website) = &record.website {
        contact_parts.push(format!(
            "\\href{{{}}}{{\\underline{{Website}}}}",
            ensure_scheme(website)
        ));
    }

    if !contact_parts.is_empty() {
        doc.push_str("\n    \\small ");
        doc.push_str(&contact_parts.join(" $|$ "));
    }
    doc.push_str("\n\\end{center}\n");
}

// ────────────────────────────────────────────────────────────────────────────
// Optional sections, in fixed order
// ────────────────────────────────────────────────────────────────────────────

fn emit_summary(doc: &mut String, record: &StructuredRecord) {
    let Some(summary) = &record.summary else {
        return;
    };
    doc.push_str("\n%-----------PROFESSIONAL SUMMARY-----------\n");
    doc.push_str("\\section{Professional Summary}\n");
    emit_prose_block(doc, &latex_escape(summary));
}

fn emit_education(doc: &mut String, record: &StructuredRecord) {
    if record.education.is_empty() {
        return;
    }
    doc.push_str("\n%-----------EDUCATION-----------\n");
    doc.push_str("\\section{Education}\n  \\resumeSubHeadingListStart\n");

    for edu in &record.education {
        doc.push_str(&format!(
            "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}\n",
            escape_opt(&edu.degree),
            escape_opt(&edu.date),
            escape_opt(&edu.institution),
            escape_opt(&edu.location),
        ));

        if edu.gpa.is_some() || edu.details.is_some() {
            doc.push_str("      \\resumeItemListStart\n");
            if let Some(gpa) = &edu.gpa {
                doc.push_str(&format!("        \\resumeItem{{GPA: {}}}\n", latex_escape(gpa)));
            }
            if let Some(details) = &edu.details {
                doc.push_str(&format!(
                    "        \\resumeItem{{{}}}\n",
                    latex_escape(details)
                ));
            }
            doc.push_str("      \\resumeItemListEnd\n");
        }
    }
    doc.push_str("  \\resumeSubHeadingListEnd\n");
}

fn emit_experience(doc: &mut String, record: &StructuredRecord) {
    if record.experience.is_empty() {
        return;
    }
    doc.push_str("\n%-----------EXPERIENCE-----------\n");
    doc.push_str("\\section{Experience}\n  \\resumeSubHeadingListStart\n");

    for exp in &record.experience {
        emit_experience_entry(doc, exp);
    }
    doc.push_str("  \\resumeSubHeadingListEnd\n");
}

fn emit_experience_entry(doc: &mut String, exp: &ExperienceEntry) {
    doc.push_str(&format!(
        "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}\n",
        escape_opt(&exp.title),
        escape_opt(&exp.date),
        escape_opt(&exp.company),
        escape_opt(&exp.location),
    ));

    if !exp.description.is_empty() {
        doc.push_str("      \\resumeItemListStart\n");
        for bullet in exp.description.iter().take(MAX_EXPERIENCE_BULLETS) {
            doc.push_str(&format!(
                "        \\resumeItem{{{}}}\n",
                latex_escape(bullet)
            ));
        }
        doc.push_str("      \\resumeItemListEnd\n");
    }
}

fn emit_projects(doc: &mut String, record: &StructuredRecord) {
    if record.projects.is_empty() {
        return;
    }
    doc.push_str("\n%-----------PROJECTS-----------\n");
    doc.push_str("\\section{Projects}\n    \\resumeSubHeadingListStart\n");

    for project in &record.projects {
        emit_project_entry(doc, project);
    }
    doc.push_str("    \\resumeSubHeadingListEnd\n");
}

fn emit_project_entry(doc: &mut String, project: &ProjectEntry) {
    let mut heading = escape_opt(&project.title);
    if let Some(tech) = &project.technologies {
        heading.push_str(&format!(" $|$ \\emph{{{}}}", latex_escape(tech)));
    }

    doc.push_str(&format!(
        "      \\resumeProjectHeading\n          {{\\textbf{{{}}}}}{{{}}}\n",
        heading,
        escape_opt(&project.date),
    ));

    // Description accepts a single string or a list; lists are joined into
    // one paragraph before sanitizing.
    let description = latex_escape(&project.description.join(" "));
    if !description.is_empty() {
        doc.push_str("          \\resumeItemListStart\n");
        doc.push_str(&format!("            \\resumeItem{{{description}}}\n"));
        if let Some(link) = &project.link {
            let url = ensure_scheme(link);
            doc.push_str(&format!(
                "            \\resumeItem{{Link: \\href{{{url}}}{{\\underline{{{}}}}}}}\n",
                latex_escape(link)
            ));
        }
        doc.push_str("          \\resumeItemListEnd\n");
    }
}

fn emit_skills(doc: &mut String, skills: &Skills) {
    let categories: [(&str, &[String]); 6] = [
        ("Languages", &skills.languages),
        ("Frameworks", &skills.frameworks),
        ("Developer Tools", &skills.tools),
        ("Libraries", &skills.libraries),
        ("Databases", &skills.databases),
        ("Other", &skills.other),
    ];

    let skill_lines: Vec<String> = categories
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(label, items)| {
            let joined = latex_escape_all(items).join(", ");
            format!("\\textbf{{{label}}}: {joined}")
        })
        .collect();

    if skill_lines.is_empty() {
        return;
    }

    doc.push_str("\n%-----------PROGRAMMING SKILLS-----------\n");
    doc.push_str("\\section{Technical Skills}\n");
    doc.push_str(" \\begin{itemize}[leftmargin=0.15in, label={}]\n    \\small{\\item{\n     ");
    doc.push_str(&skill_lines.join(" \\\\\n     "));
    doc.push_str("\n    }}\n \\end{itemize}\n");
}

fn emit_certifications(doc: &mut String, record: &StructuredRecord) {
    if record.certifications.is_empty() {
        return;
    }
    doc.push_str("\n%-----------CERTIFICATIONS-----------\n");
    doc.push_str("\\section{Certifications}\n  \\resumeSubHeadingListStart\n");

    for cert in &record.certifications {
        doc.push_str(&format!(
            "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{}}\n",
            escape_opt(&cert.name),
            escape_opt(&cert.date),
            escape_opt(&cert.issuer),
        ));
    }
    doc.push_str("  \\resumeSubHeadingListEnd\n");
}

fn emit_awards(doc: &mut String, record: &StructuredRecord) {
    if record.awards.is_empty() {
        return;
    }
    doc.push_str("\n%-----------AWARDS-----------\n");
    doc.push_str("\\section{Awards \\& Honors}\n  \\resumeItemListStart\n");
    for award in &record.awards {
        doc.push_str(&format!("    \\resumeItem{{{}}}\n", latex_escape(award)));
    }
    doc.push_str("  \\resumeItemListEnd\n");
}

fn emit_languages(doc: &mut String, record: &StructuredRecord) {
    if record.languages.is_empty() {
        return;
    }
    doc.push_str("\n%-----------LANGUAGES-----------\n");
    doc.push_str("\\section{Languages}\n  \\resumeItemListStart\n");
    for language in &record.languages {
        doc.push_str(&format!("    \\resumeItem{{{}}}\n", latex_escape(language)));
    }
    doc.push_str("  \\resumeItemListEnd\n");
}

fn emit_custom_sections(doc: &mut String, record: &StructuredRecord) {
    for section in &record.custom_sections {
        emit_custom_section(doc, section);
    }
}

/// Content with more than one non-blank line renders as a bullet list
/// (leading bullet glyphs stripped before re-emission); single-line content
/// renders as prose.
fn emit_custom_section(doc: &mut String, section: &CustomSection) {
    let title = escape_opt(&section.title);
    doc.push_str(&format!(
        "\n%-----------{}-----------\n\\section{{{title}}}\n",
        title.to_uppercase()
    ));

    let lines: Vec<&str> = section
        .content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() > 1 {
        doc.push_str("  \\resumeItemListStart\n");
        for line in lines {
            let stripped = line.trim_start_matches(['•', '*', '-', '+', ' ']).trim();
            if !stripped.is_empty() {
                doc.push_str(&format!(
                    "    \\resumeItem{{{}}}\n",
                    latex_escape(stripped)
                ));
            }
        }
        doc.push_str("  \\resumeItemListEnd\n");
    } else if let Some(line) = lines.first() {
        emit_prose_block(doc, &latex_escape(line));
    }
}

/// Single-paragraph block used by the summary and single-line custom
/// sections. Takes already-escaped text.
fn emit_prose_block(doc: &mut String, escaped: &str) {
    doc.push_str(" \\begin{itemize}[leftmargin=0.15in, label={}]\n    \\small{\\item{\n     ");
    doc.push_str(escaped);
    doc.push_str("\n    }}\n \\end{itemize}\n");
}

fn escape_opt(field: &Option<String>) -> String {
    field.as_deref().map(latex_escape).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
