//! Session document model.
//!
//! A session document is plain markdown: `## <Name>` headings, each optionally
//! followed by one fenced YAML block. Only the blocks are machine-managed;
//! everything else belongs to humans and must survive rewrites byte for byte.
//!
//! ```text
//! ## Current Work        <- heading_line
//! ```yaml                <- open marker
//! mode: "build"          <- block start
//! phase: "enablement"
//! ```                    <- block end (exclusive)
//! ```

mod rewrite;
mod store;

pub use rewrite::replace_section;
pub use store::SessionStore;

use serde_yaml::{Mapping, Value};

use crate::error::{Result, SessionError};

pub const CURRENT_WORK: &str = "Current Work";
pub const SESSION_METADATA: &str = "Session Metadata";
pub const SESSION_NOTES: &str = "Session Notes";

const HEADING_PREFIX: &str = "## ";
const BLOCK_OPEN: &str = "```yaml";
const BLOCK_CLOSE: &str = "```";

/// Name of a top-level heading, if `line` is one.
pub(crate) fn heading_name(line: &str) -> Option<&str> {
    line.trim().strip_prefix(HEADING_PREFIX).map(str::trim)
}

pub(crate) fn is_block_open(line: &str) -> bool {
    line.trim() == BLOCK_OPEN
}

pub(crate) fn is_block_close(line: &str) -> bool {
    line.trim() == BLOCK_CLOSE
}

/// Line span of a fenced block's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Line holding the open marker.
    pub open_line: usize,
    /// First content line.
    pub start: usize,
    /// Close marker line, or the line count when the block never closes.
    pub end: usize,
    pub terminated: bool,
}

/// A named region of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub heading_line: usize,
    pub block: Option<BlockSpan>,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Outside,
    AwaitOpen(usize),
    InBlock(usize),
}

/// A parsed session document with its section index.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    sections: Vec<Section>,
}

impl Document {
    /// Index `text` in a single pass.
    ///
    /// Never fails. A block without a close marker runs to the end of the
    /// document, and duplicate headings are indexed separately.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let mut sections: Vec<Section> = Vec::new();
        let mut state = ScanState::Outside;

        for (i, line) in lines.iter().enumerate() {
            state = match state {
                ScanState::InBlock(idx) => {
                    if is_block_close(line) {
                        if let Some(block) = sections[idx].block.as_mut() {
                            block.end = i;
                            block.terminated = true;
                        }
                        ScanState::Outside
                    } else {
                        ScanState::InBlock(idx)
                    }
                }
                ScanState::Outside | ScanState::AwaitOpen(_) if heading_name(line).is_some() => {
                    sections.push(Section {
                        name: heading_name(line).unwrap_or_default().to_string(),
                        heading_line: i,
                        block: None,
                    });
                    ScanState::AwaitOpen(sections.len() - 1)
                }
                ScanState::AwaitOpen(idx) if is_block_open(line) => {
                    sections[idx].block = Some(BlockSpan {
                        open_line: i,
                        start: i + 1,
                        end: lines.len(),
                        terminated: false,
                    });
                    ScanState::InBlock(idx)
                }
                other => other,
            };
        }

        Self { lines, sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section called `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Raw text of the first `name` section's block.
    pub fn raw_block(&self, name: &str) -> Option<String> {
        let block = self.section(name)?.block?;
        Some(self.lines[block.start..block.end].join("\n"))
    }

    /// Parse a section's block as YAML.
    ///
    /// Returns `None` when the section or block is absent or the block is blank.
    pub fn block_value(&self, name: &str) -> Result<Option<Value>> {
        let Some(raw) = self.raw_block(name) else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_yaml::from_str(&raw)
            .map_err(|e| SessionError::yaml(format!("{} section", name), e))?;
        match value {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }

    /// Parse a section's block as a YAML mapping.
    pub fn block_mapping(&self, name: &str) -> Result<Option<Mapping>> {
        match self.block_value(name)? {
            None => Ok(None),
            Some(Value::Mapping(mapping)) => Ok(Some(mapping)),
            Some(_) => Err(SessionError::NotAMapping {
                context: format!("{} section", name),
            }),
        }
    }

    /// The "Current Work" mapping, empty when the section carries no block.
    pub fn current_work(&self) -> Result<Mapping> {
        Ok(self.block_mapping(CURRENT_WORK)?.unwrap_or_default())
    }

    /// Reassemble the document text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Read a string-ish scalar out of a mapping.
///
/// Numbers and booleans are stringified; null and empty strings count as absent.
pub fn scalar_field(mapping: &Mapping, key: &str) -> Option<String> {
    let value = mapping.get(key)?;
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
