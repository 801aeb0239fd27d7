use std::path::{Path, PathBuf};

use crate::error::{Result, SessionError};
use crate::models::ArtifactPaths;

const PREENGAGEMENT_KEYWORDS: &[&str] = &["opportunity", "use-case", "ai-readiness"];
const DEFAULT_PREENGAGEMENT_BASE: &str = "/preengagement";
const DEFAULT_DELIVERY_BASE: &str = "/delivery";
const DEFAULT_DELIVERY_DATA: &str = "/delivery/data";
const CONFIG_DIR: &str = "config";

fn under(root: &Path, base: &str, artifact: &str) -> PathBuf {
    root.join(base.trim_start_matches('/')).join(artifact)
}

/// Map an artifact name onto the file it should live in.
///
/// Resolution goes by suffix, then keyword:
/// - `/x` is taken relative to the project root
/// - `.md` naming an opportunity, use case or AI readiness goes under preengagement
/// - other `.md`, `.py` and `.ipynb` go under delivery
/// - `.csv` goes under the delivery data directory
/// - `.yml` and `.yaml` go under `config/`
/// - anything else sits at the project root
pub fn resolve_artifact_path(root: &Path, artifact: &str, paths: &ArtifactPaths) -> PathBuf {
    let delivery_base = paths
        .delivery
        .base_path
        .as_deref()
        .unwrap_or(DEFAULT_DELIVERY_BASE);

    if let Some(relative) = artifact.strip_prefix('/') {
        return root.join(relative.trim_start_matches('/'));
    }
    if artifact.ends_with(".md") {
        if PREENGAGEMENT_KEYWORDS.iter().any(|k| artifact.contains(k)) {
            let base = paths
                .preengagement
                .base_path
                .as_deref()
                .unwrap_or(DEFAULT_PREENGAGEMENT_BASE);
            return under(root, base, artifact);
        }
        return under(root, delivery_base, artifact);
    }
    if artifact.ends_with(".py") || artifact.ends_with(".ipynb") {
        return under(root, delivery_base, artifact);
    }
    if artifact.ends_with(".csv") {
        let data = paths
            .delivery
            .data
            .as_deref()
            .unwrap_or(DEFAULT_DELIVERY_DATA);
        return under(root, data, artifact);
    }
    if artifact.ends_with(".yaml") || artifact.ends_with(".yml") {
        return root.join(CONFIG_DIR).join(artifact);
    }
    root.join(artifact)
}

pub fn resolve_artifact_paths(
    root: &Path,
    artifacts: &[String],
    paths: &ArtifactPaths,
) -> Vec<PathBuf> {
    artifacts
        .iter()
        .map(|artifact| resolve_artifact_path(root, artifact, paths))
        .collect()
}

pub fn missing_artifacts(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().filter(|p| !p.exists()).cloned().collect()
}

/// Write a markdown stub so the artifact exists.
pub fn create_placeholder(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content = format!(
        "# {name}\n\n<!-- Placeholder file created by vt check-artifacts -->\n<!-- Replace with the actual content for {name} -->\n"
    );
    std::fs::write(path, content).map_err(|e| SessionError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtifactLocation;

    fn paths() -> ArtifactPaths {
        ArtifactPaths {
            preengagement: ArtifactLocation {
                base_path: Some("/preengagement".to_string()),
                data: None,
            },
            delivery: ArtifactLocation {
                base_path: Some("/delivery".to_string()),
                data: None,
            },
        }
    }

    fn resolve(artifact: &str) -> PathBuf {
        resolve_artifact_path(Path::new("/project"), artifact, &paths())
    }

    #[test]
    fn test_absolute_paths() {
        assert_eq!(resolve("/docs/readme.md"), PathBuf::from("/project/docs/readme.md"));
    }

    #[test]
    fn test_documentation_files() {
        assert_eq!(
            resolve("use-case.md"),
            PathBuf::from("/project/preengagement/use-case.md")
        );
        assert_eq!(
            resolve("opportunity-brief.md"),
            PathBuf::from("/project/preengagement/opportunity-brief.md")
        );
        assert_eq!(
            resolve("requirements.md"),
            PathBuf::from("/project/delivery/requirements.md")
        );
    }

    #[test]
    fn test_code_and_notebook_files() {
        assert_eq!(resolve("model.py"), PathBuf::from("/project/delivery/model.py"));
        assert_eq!(
            resolve("analysis.ipynb"),
            PathBuf::from("/project/delivery/analysis.ipynb")
        );
    }

    #[test]
    fn test_data_files() {
        assert_eq!(
            resolve("data.csv"),
            PathBuf::from("/project/delivery/data/data.csv")
        );
    }

    #[test]
    fn test_config_files() {
        assert_eq!(resolve("settings.yml"), PathBuf::from("/project/config/settings.yml"));
        assert_eq!(resolve("settings.yaml"), PathBuf::from("/project/config/settings.yaml"));
    }

    #[test]
    fn test_default_location() {
        assert_eq!(resolve("README"), PathBuf::from("/project/README"));
        assert_eq!(resolve("notes.txt"), PathBuf::from("/project/notes.txt"));
    }

    #[test]
    fn test_missing_artifact_paths_config_uses_defaults() {
        let root = Path::new("/project");
        let defaults = ArtifactPaths::default();
        assert_eq!(
            resolve_artifact_path(root, "setup.md", &defaults),
            PathBuf::from("/project/delivery/setup.md")
        );
        assert_eq!(
            resolve_artifact_path(root, "ai-readiness.md", &defaults),
            PathBuf::from("/project/preengagement/ai-readiness.md")
        );
        assert_eq!(
            resolve_artifact_path(root, "rows.csv", &defaults),
            PathBuf::from("/project/delivery/data/rows.csv")
        );
    }

    #[test]
    fn test_missing_and_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.md");
        std::fs::write(&present, "here").unwrap();
        let absent = dir.path().join("nested/absent.md");

        let missing = missing_artifacts(&[present.clone(), absent.clone()]);
        assert_eq!(missing, vec![absent.clone()]);

        create_placeholder(&absent).unwrap();
        let content = std::fs::read_to_string(&absent).unwrap();
        assert!(content.starts_with("# absent.md\n"));
        assert!(missing_artifacts(&[present, absent]).is_empty());
    }
}
