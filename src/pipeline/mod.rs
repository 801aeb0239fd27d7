//! Phase table lookups and phase advancement.

mod advance;

pub use advance::{advance_session, AdvanceOutcome, PhaseTransition};

use std::path::Path;

use crate::error::{Result, SessionError};
use crate::models::{ArtifactPaths, PhaseDescriptor, PipelineConfig};

/// Read-only view over the declarative phase table.
///
/// Lookups are linear scans; tables hold a handful of phases.
#[derive(Debug, Clone, Default)]
pub struct PhaseGraph {
    config: PipelineConfig,
}

impl PhaseGraph {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SessionError::ConfigMissing {
                what: "Pipeline configuration",
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: PipelineConfig = serde_yaml::from_str(content)
            .map_err(|e| SessionError::yaml("pipeline configuration", e))?;
        Ok(Self::new(config))
    }

    pub fn phases(&self) -> &[PhaseDescriptor] {
        &self.config.phases
    }

    pub fn artifact_paths(&self) -> &ArtifactPaths {
        &self.config.artifact_paths
    }

    /// Successor of `name`. `None` for the last phase and for unknown phases.
    pub fn get_next_phase(&self, name: &str) -> Option<&str> {
        self.get_phase_info(name)?.next_phase.as_deref()
    }

    pub fn get_phase_info(&self, name: &str) -> Option<&PhaseDescriptor> {
        self.config.phases.iter().find(|phase| phase.name == name)
    }

    /// Required artifacts for `name`, empty when the phase is unknown.
    pub fn phase_artifacts(&self, name: &str) -> &[String] {
        match self.get_phase_info(name) {
            Some(phase) => &phase.artifacts,
            None => {
                tracing::warn!("Phase '{}' not found in pipeline configuration", name);
                &[]
            }
        }
    }
}
