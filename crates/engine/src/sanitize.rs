//! LaTeX text sanitization.
//!
//! Everything interpolated into the synthesized document goes through
//! `latex_escape` first. The escape runs as a single pass over the input so
//! the backslashes and braces it *inserts* are never themselves re-escaped;
//! ordering the backslash case first only matters for characters already in
//! the input.

/// Escapes arbitrary text for verbatim embedding in a LaTeX document.
///
/// Handles, in order of precedence within the single pass:
/// 1. the escape character itself (`\` → `\textbackslash{}`),
/// 2. a fixed table of typographic Unicode characters mapped to their
///    nearest ASCII-safe LaTeX equivalents,
/// 3. the remaining LaTeX-reserved characters via their literal-escape forms.
///
/// Empty input returns an empty string.
pub fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // Escape character first: an input backslash must not combine
            // with a following reserved character into a real command.
            '\\' => out.push_str("\\textbackslash{}"),

            // Typographic Unicode replacements.
            '○' | '●' | '•' | '◦' | '▪' | '▫' => out.push_str("\\textbullet{}"),
            '–' => out.push_str("--"),
            '—' => out.push_str("---"),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '…' => out.push_str("..."),
            '°' => out.push_str("\\textdegree{}"),
            '±' => out.push_str("\\textpm{}"),
            '×' => out.push_str("\\texttimes{}"),
            '÷' => out.push_str("\\textdiv{}"),
            '€' => out.push_str("\\texteuro{}"),
            '£' => out.push_str("\\textsterling{}"),
            '¥' => out.push_str("\\textyen{}"),
            '©' => out.push_str("\\textcopyright{}"),
            '®' => out.push_str("\\textregistered{}"),
            '™' => out.push_str("\\texttrademark{}"),

            // Reserved LaTeX characters.
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\textasciicircum{}"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),

            _ => out.push(c),
        }
    }
    out
}

/// Element-wise form for already-tokenized input (bullet lists, skill lists).
pub fn latex_escape_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| latex_escape(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_returns_empty_string() {
        assert_eq!(latex_escape(""), "");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(latex_escape("Senior Rust Engineer"), "Senior Rust Engineer");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        assert_eq!(
            latex_escape("50% of $100 & #1"),
            "50\\% of \\$100 \\& \\#1"
        );
        assert_eq!(latex_escape("snake_case"), "snake\\_case");
        assert_eq!(latex_escape("{a}~b^c"),
            "\\{a\\}\\textasciitilde{}b\\textasciicircum{}c");
    }

    #[test]
    fn test_escape_character_handled_first() {
        // The backslash itself becomes the literal macro; the inserted braces
        // must survive as macro delimiters, not get re-escaped.
        assert_eq!(latex_escape("\\"), "\\textbackslash{}");
        assert_eq!(latex_escape("C:\\dir"), "C:\\textbackslash{}dir");
    }

    #[test]
    fn test_no_double_escaping_within_a_pass() {
        // An input backslash followed by a reserved character must produce
        // two independent escapes, never a combined command.
        assert_eq!(latex_escape("\\%"), "\\textbackslash{}\\%");
    }

    #[test]
    fn test_unicode_bullets_collapse_to_textbullet() {
        for bullet in ["○", "●", "•", "◦", "▪", "▫"] {
            assert_eq!(latex_escape(bullet), "\\textbullet{}");
        }
    }

    #[test]
    fn test_typographic_replacements() {
        assert_eq!(latex_escape("2019–2021"), "2019--2021");
        assert_eq!(latex_escape("wait—what"), "wait---what");
        assert_eq!(latex_escape("‘quoted’ “text”"), "'quoted' \"text\"");
        assert_eq!(latex_escape("etc…"), "etc...");
        assert_eq!(latex_escape("€5 £3 ¥100"),
            "\\texteuro{}5 \\textsterling{}3 \\textyen{}100");
        assert_eq!(latex_escape("©®™"),
            "\\textcopyright{}\\textregistered{}\\texttrademark{}");
        assert_eq!(latex_escape("30° ±1 2×3 6÷2"),
            "30\\textdegree{} \\textpm{}1 2\\texttimes{}3 6\\textdiv{}2");
    }

    #[test]
    fn test_element_wise_sanitization() {
        let items = vec!["100% uptime".to_string(), "A&B".to_string()];
        assert_eq!(
            latex_escape_all(&items),
            vec!["100\\% uptime".to_string(), "A\\&B".to_string()]
        );
        assert!(latex_escape_all(&[]).is_empty());
    }
}
