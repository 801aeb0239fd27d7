//! Project layout configuration.
//!
//! All paths are relative to the project root. Configuration is via
//! environment variables:
//! - `VALUE_TRAIN_SESSION_FILE` - session document (default: `docs/session-context/ACTIVE_SESSION.md`)
//! - `VALUE_TRAIN_PIPELINE_FILE` - phase table (default: `config/pipeline.yml`)
//! - `VALUE_TRAIN_CHECKLIST_DIR` - per-mode checklists (default: `docs/rules/checklists`)
//! - `VALUE_TRAIN_OPERATOR` / `VALUE_TRAIN_ASSISTANT` - identities written by `migrate`

use std::path::{Path, PathBuf};

const DEFAULT_SESSION_FILE: &str = "docs/session-context/ACTIVE_SESSION.md";
const DEFAULT_PIPELINE_FILE: &str = "config/pipeline.yml";
const DEFAULT_CHECKLIST_DIR: &str = "docs/rules/checklists";
const UNKNOWN: &str = "unknown";

/// Where the session tooling finds its files inside a project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub session_file: PathBuf,
    pub pipeline_file: PathBuf,
    pub checklist_dir: PathBuf,
    /// Operator recorded in freshly rendered session documents.
    pub operator: String,
    /// Assistant recorded in freshly rendered session documents.
    pub assistant: String,
}

impl ProjectLayout {
    /// Default layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            session_file: root.join(DEFAULT_SESSION_FILE),
            pipeline_file: root.join(DEFAULT_PIPELINE_FILE),
            checklist_dir: root.join(DEFAULT_CHECKLIST_DIR),
            operator: UNKNOWN.to_string(),
            assistant: UNKNOWN.to_string(),
            root,
        }
    }

    /// Load layout overrides from environment variables.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        let mut layout = Self::new(root);

        if let Ok(path) = std::env::var("VALUE_TRAIN_SESSION_FILE") {
            layout.session_file = layout.root.join(path);
        }
        if let Ok(path) = std::env::var("VALUE_TRAIN_PIPELINE_FILE") {
            layout.pipeline_file = layout.root.join(path);
        }
        if let Ok(path) = std::env::var("VALUE_TRAIN_CHECKLIST_DIR") {
            layout.checklist_dir = layout.root.join(path);
        }
        if let Ok(operator) = std::env::var("VALUE_TRAIN_OPERATOR") {
            layout.operator = operator;
        }
        if let Ok(assistant) = std::env::var("VALUE_TRAIN_ASSISTANT") {
            layout.assistant = assistant;
        }

        layout
    }

    /// Checklist file for a mode, e.g. `build-checklist.md`.
    pub fn checklist_for(&self, mode: &str) -> PathBuf {
        self.checklist_dir.join(format!("{}-checklist.md", mode))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
