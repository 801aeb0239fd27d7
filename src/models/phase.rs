use serde::{Deserialize, Serialize};

/// The declarative pipeline table, usually `config/pipeline.yml`.
///
/// Keys this tooling does not consume (for example `modes`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Free-form table metadata (name, version, ...).
    #[serde(default)]
    pub metadata: Option<serde_yaml::Value>,
    #[serde(default)]
    pub phases: Vec<PhaseDescriptor>,
    #[serde(default)]
    pub artifact_paths: ArtifactPaths,
}

/// A named stage of the pipeline.
///
/// Phases form a forward chain through `next_phase`. The chain is assumed to
/// be acyclic; nothing verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Operating mode the session switches to when entering this phase.
    #[serde(default)]
    pub mode: Option<String>,
    /// Agent role that owns the phase.
    #[serde(default)]
    pub owner: Option<String>,
    /// Artifact names or patterns that must exist before the phase is done.
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Successor phase. `None` marks the end of the pipeline.
    #[serde(default)]
    pub next_phase: Option<String>,
}

/// Base directories used to resolve artifact names into paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactPaths {
    #[serde(default)]
    pub preengagement: ArtifactLocation,
    #[serde(default)]
    pub delivery: ArtifactLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactLocation {
    /// Project-root relative base, written with a leading `/`.
    pub base_path: Option<String>,
    /// Data subdirectory, written with a leading `/`.
    pub data: Option<String>,
}
