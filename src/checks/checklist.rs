use std::path::Path;

use crate::error::{Result, SessionError};

const UNCHECKED_MARKERS: &[&str] = &["- [ ]", "* [ ]"];

/// An open checkbox in a checklist file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncheckedItem {
    /// 1-based.
    pub line_number: usize,
    pub text: String,
}

/// Find unchecked items. Plain substring match, no markdown parsing.
pub fn scan_unchecked(content: &str) -> Vec<UncheckedItem> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| UNCHECKED_MARKERS.iter().any(|m| line.contains(m)))
        .map(|(i, line)| UncheckedItem {
            line_number: i + 1,
            text: line.trim().to_string(),
        })
        .collect()
}

pub fn load_checklist(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SessionError::ConfigMissing {
            what: "Checklist file",
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))
}
