//! # Title Pattern Strategies
//!
//! ## Purpose
//! Ordered, named title-extraction strategies applied to the leading window of
//! a document. Each strategy is independent and unit-testable; the extractor
//! tries them in fixed priority order and stops at the first success.
//!
//! ## Input/Output Specification
//! - **Input**: Leading lines of a document, its filename, the folder-implied type
//! - **Output**: `Option<String>` title per strategy; the filename fallback
//!   always succeeds
//!
//! Patterns tolerate the noise of scraped text: headings split across lines,
//! stray metadata before the title, inconsistent casing and accents.

use crate::config::ExtractionConfig;
use crate::DocType;
use regex::Regex;

/// Input shared by all title strategies
pub struct TitleInput<'a> {
    /// Leading lines of the document (bounded by the header scan window)
    pub lines: &'a [&'a str],
    /// Filename without extension
    pub filename: &'a str,
    /// Type implied by the containing folder
    pub declared_type: DocType,
}

/// A single named title-extraction strategy
pub trait TitlePattern: Send + Sync {
    /// Stable strategy name, used in extraction debug logs
    fn name(&self) -> &'static str;

    /// Attempt to extract a title; `None` means this strategy does not apply
    fn apply(&self, input: &TitleInput<'_>) -> Option<String>;
}

/// Build the full strategy list in priority order.
pub fn default_patterns(config: &ExtractionConfig) -> Vec<Box<dyn TitlePattern>> {
    vec![
        Box::new(PlanningLabelPattern::new(config.structured_pattern_lines)),
        Box::new(ResolutionNumberPattern::new(config.structured_pattern_lines)),
        Box::new(LegalHeadingPattern::new(config.heading_pattern_lines)),
        Box::new(NumberYearLinePattern::new(config.heading_pattern_lines)),
        Box::new(FilenameFallback),
    ]
}

/// Planning documents label their number under a bare `CONPES` token, often on
/// the following line. Applies only when the folder says the document is a
/// planning document.
pub struct PlanningLabelPattern {
    window: usize,
    bare_label: Regex,
    label_with_number: Regex,
    four_digits: Regex,
}

impl PlanningLabelPattern {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            bare_label: Regex::new(r"^CONPES\s*$").expect("valid regex"),
            label_with_number: Regex::new(r"^CONPES\s+\d{4}").expect("valid regex"),
            four_digits: Regex::new(r"\d{4}").expect("valid regex"),
        }
    }
}

impl TitlePattern for PlanningLabelPattern {
    fn name(&self) -> &'static str {
        "planning-label"
    }

    fn apply(&self, input: &TitleInput<'_>) -> Option<String> {
        if input.declared_type != DocType::PlanningDoc {
            return None;
        }

        for (i, line) in input.lines.iter().take(self.window).enumerate() {
            let trimmed = line.trim();

            if self.bare_label.is_match(trimmed) {
                // The document number may sit on the next non-blank line
                let next = input.lines[i + 1..]
                    .iter()
                    .map(|l| l.trim())
                    .find(|l| !l.is_empty());
                if let Some(next) = next {
                    if next.len() == 4 && next.chars().all(|c| c.is_ascii_digit()) {
                        return Some(format!("CONPES {}", next));
                    }
                }
            }

            if trimmed.contains("CONPES")
                && self.four_digits.is_match(trimmed)
                && self.label_with_number.is_match(trimmed)
            {
                return Some(trimmed.to_string());
            }
        }

        None
    }
}

/// Resolutions open with a "RESOLUCIÓN NÚMERO ..." phrase, or with a bare
/// multi-digit token paired with a year. The bare-number variant is a known
/// precision/recall trade-off: any unrelated sentence carrying a number and a
/// year matches it.
pub struct ResolutionNumberPattern {
    window: usize,
    number_phrase: Regex,
    bare_number_year: Regex,
}

impl ResolutionNumberPattern {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            number_phrase: Regex::new(r"(?i)RESOLUCI[OÓ]N\s+(?:NÚMERO|N[ÚU]MERO|No\.?|#)?\s*\d+")
                .expect("valid regex"),
            bare_number_year: Regex::new(r"^\d{3,6}\b.*\d{4}").expect("valid regex"),
        }
    }
}

impl TitlePattern for ResolutionNumberPattern {
    fn name(&self) -> &'static str {
        "resolution-number"
    }

    fn apply(&self, input: &TitleInput<'_>) -> Option<String> {
        if input.declared_type != DocType::Resolution {
            return None;
        }

        for line in input.lines.iter().take(self.window) {
            let trimmed = line.trim();

            if self.number_phrase.is_match(trimmed) {
                return Some(trimmed.to_string());
            }

            if self.bare_number_year.is_match(trimmed) {
                return Some(format!("Resolución {}", trimmed));
            }
        }

        None
    }
}

/// Generic legal heading: a line beginning with one of the fixed type keywords
/// and eventually carrying a four-digit year, within the first non-blank lines
/// of the document.
pub struct LegalHeadingPattern {
    window: usize,
    heading: Regex,
}

impl LegalHeadingPattern {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            heading: Regex::new(r"(?i)^(LEY|DECRETO|CIRCULAR|RESOLUCI[OÓ]N|CONPES).*\d{4}")
                .expect("valid regex"),
        }
    }
}

impl TitlePattern for LegalHeadingPattern {
    fn name(&self) -> &'static str {
        "legal-heading"
    }

    fn apply(&self, input: &TitleInput<'_>) -> Option<String> {
        for line in input
            .lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(self.window)
        {
            if self.heading.is_match(line) {
                return Some(line.to_string());
            }
        }

        None
    }
}

/// Heuristic fallback: any sufficiently long line carrying both a 3-4 digit
/// token and a four-digit year.
pub struct NumberYearLinePattern {
    window: usize,
    number_year: Regex,
}

impl NumberYearLinePattern {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            number_year: Regex::new(r"\d{3,4}.*\d{4}").expect("valid regex"),
        }
    }
}

impl TitlePattern for NumberYearLinePattern {
    fn name(&self) -> &'static str {
        "number-year-line"
    }

    fn apply(&self, input: &TitleInput<'_>) -> Option<String> {
        for line in input
            .lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(self.window)
        {
            if line.len() > 10 && self.number_year.is_match(line) {
                return Some(line.to_string());
            }
        }

        None
    }
}

/// Last resort: the filename with separators replaced by spaces, title-cased.
/// Always succeeds.
pub struct FilenameFallback;

impl TitlePattern for FilenameFallback {
    fn name(&self) -> &'static str {
        "filename"
    }

    fn apply(&self, input: &TitleInput<'_>) -> Option<String> {
        Some(title_case(
            &input.filename.replace(['_', '-'], " "),
        ))
    }
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
