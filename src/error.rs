use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, interpreting, or rewriting session state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{what} not found at {}", path.display())]
    ConfigMissing { what: &'static str, path: PathBuf },

    #[error("Invalid YAML in {context}: {source}")]
    InvalidYaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{context} is not a mapping")]
    NotAMapping { context: String },

    #[error("Unknown legacy format")]
    UnknownFormat,

    #[error("Failed to parse legacy content ({format})")]
    EmptyExtraction { format: &'static str },

    #[error("No {0} section found in session document")]
    SectionMissing(String),

    #[error("No current {field} found in {section}")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    #[error("{0} section was not rewritten")]
    RewriteFailed(String),

    #[error("Phase '{0}' not found in pipeline configuration")]
    PhaseNotFound(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(context: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::InvalidYaml {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
