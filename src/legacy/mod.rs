//! Legacy session migration.
//!
//! Historical session files come in several encodings. Each one is recognised
//! by an ordered rule list (first match wins) and mapped onto a
//! [`PartialSessionState`], then every format goes through the same default
//! filling in [`PartialSessionState::into_canonical`].

mod extract;

use crate::error::{Result, SessionError};
use crate::models::{CanonicalSessionState, LegacyFormat, PartialSessionState};

type Detector = fn(&str) -> bool;
type Extractor = fn(&str) -> Result<PartialSessionState>;

struct FormatRule {
    format: LegacyFormat,
    detect: Detector,
    extract: Extractor,
}

/// Detection order matters: a JSON object may contain `mode=`, and markdown
/// may contain `---` rules.
const RULES: &[FormatRule] = &[
    FormatRule {
        format: LegacyFormat::StructuredLiteral,
        detect: is_structured_literal,
        extract: extract::structured_literal,
    },
    FormatRule {
        format: LegacyFormat::DelimitedHeader,
        detect: is_delimited_header,
        extract: extract::delimited_header,
    },
    FormatRule {
        format: LegacyFormat::HeadedSections,
        detect: is_headed_sections,
        extract: extract::headed_sections,
    },
    FormatRule {
        format: LegacyFormat::KeyValueLines,
        detect: is_key_value_lines,
        extract: extract::key_value_lines,
    },
];

fn is_structured_literal(text: &str) -> bool {
    let text = text.trim();
    text.starts_with('{')
        && text.ends_with('}')
        && serde_json::from_str::<serde_json::Value>(text).is_ok()
}

fn is_delimited_header(text: &str) -> bool {
    let text = text.trim();
    text.contains("---") && (text.contains("mode:") || text.contains("phase:"))
}

fn is_headed_sections(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("# ") && text.contains("## ")
}

fn is_key_value_lines(text: &str) -> bool {
    let text = text.trim();
    text.contains("mode=") || text.contains("phase=")
}

/// Classify legacy content. Total: anything unrecognised is `Unknown`.
pub fn classify(text: &str) -> LegacyFormat {
    RULES
        .iter()
        .find(|rule| (rule.detect)(text))
        .map(|rule| rule.format)
        .unwrap_or(LegacyFormat::Unknown)
}

/// Run the extractor for an already classified format, without defaults.
pub fn extract(format: LegacyFormat, text: &str) -> Result<PartialSessionState> {
    let rule = RULES
        .iter()
        .find(|rule| rule.format == format)
        .ok_or(SessionError::UnknownFormat)?;
    (rule.extract)(text)
}

/// Extract and default-fill content of a known format.
pub fn normalize_as(format: LegacyFormat, text: &str) -> Result<CanonicalSessionState> {
    let partial = extract(format, text)?;
    tracing::debug!(?partial, "extracted legacy fields");
    Ok(partial.into_canonical())
}

/// Classify, extract and default-fill in one step.
pub fn normalize(text: &str) -> Result<CanonicalSessionState> {
    normalize_as(classify(text), text)
}
