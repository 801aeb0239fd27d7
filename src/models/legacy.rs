use serde::{Deserialize, Serialize};

/// The superseded encodings a legacy session file may use.
///
/// - `StructuredLiteral`: A single JSON object
/// - `DelimitedHeader`: YAML between `---` delimiters, optionally followed by prose
/// - `HeadedSections`: Markdown with one heading per field
/// - `KeyValueLines`: `key=value` lines with dotted `task.` keys
/// - `Unknown`: None of the above
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyFormat {
    StructuredLiteral,
    DelimitedHeader,
    HeadedSections,
    KeyValueLines,
    Unknown,
}

impl LegacyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredLiteral => "structured-literal",
            Self::DelimitedHeader => "delimited-header",
            Self::HeadedSections => "headed-sections",
            Self::KeyValueLines => "key-value-lines",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LegacyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
