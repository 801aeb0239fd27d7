use std::path::{Path, PathBuf};

use crate::error::{Result, SessionError};

use super::Document;

/// The session document on disk.
///
/// Each call reads or writes the whole file; nothing is cached between calls
/// and concurrent writers simply overwrite each other.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<String> {
        if !self.exists() {
            return Err(SessionError::ConfigMissing {
                what: "Session document",
                path: self.path.clone(),
            });
        }
        std::fs::read_to_string(&self.path).map_err(|e| SessionError::io(&self.path, e))
    }

    pub fn load_document(&self) -> Result<Document> {
        Ok(Document::parse(&self.load()?))
    }

    /// Overwrite the document, creating parent directories as needed.
    pub fn save(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
        }
        std::fs::write(&self.path, content).map_err(|e| SessionError::io(&self.path, e))?;
        tracing::info!("Updated session document at {}", self.path.display());
        Ok(())
    }

    /// Copy the current document to `<file name>.backup`.
    ///
    /// Returns `None` when there is nothing to back up.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".backup");
        let backup_path = self.path.with_file_name(name);
        std::fs::copy(&self.path, &backup_path).map_err(|e| SessionError::io(&backup_path, e))?;
        tracing::info!("Created backup: {}", backup_path.display());
        Ok(Some(backup_path))
    }
}
