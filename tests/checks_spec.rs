//! Artifact and checklist validation commands.

use speculate2::speculate;
use tempfile::TempDir;
use value_train::commands::{self, ArtifactCheckOptions, ChecklistOptions, CommandStatus};
use value_train::config::ProjectLayout;

const PIPELINE: &str = include_str!("fixtures/pipeline.yml");
const SESSION: &str = include_str!("fixtures/ACTIVE_SESSION.md");
const CHECKLIST: &str = include_str!("fixtures/build-checklist.md");

fn write(path: &std::path::Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Helper to lay out a project whose session sits in the enablement phase.
fn setup_project() -> (TempDir, ProjectLayout) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let layout = ProjectLayout::new(dir.path());
    write(&layout.pipeline_file, PIPELINE);
    write(&layout.session_file, SESSION);
    (dir, layout)
}

speculate! {
    describe "check_artifacts" {
        it "passes when every artifact is present" {
            let (dir, layout) = setup_project();
            write(&dir.path().join("delivery/setup.md"), "# setup");
            write(&dir.path().join("config/config.yml"), "key: value");

            let status = commands::check_artifacts(
                &layout,
                &ArtifactCheckOptions { strict: true, ..Default::default() },
            ).unwrap();

            assert_eq!(status, CommandStatus::Success);
        }

        it "only warns about missing artifacts by default" {
            let (_dir, layout) = setup_project();

            let status = commands::check_artifacts(&layout, &ArtifactCheckOptions::default()).unwrap();

            assert_eq!(status, CommandStatus::Success);
        }

        it "fails on missing artifacts in strict mode" {
            let (_dir, layout) = setup_project();

            let status = commands::check_artifacts(
                &layout,
                &ArtifactCheckOptions { strict: true, ..Default::default() },
            ).unwrap();

            assert_eq!(status, CommandStatus::Failed);
        }

        it "checks an explicitly named phase" {
            let (dir, layout) = setup_project();

            let status = commands::check_artifacts(
                &layout,
                &ArtifactCheckOptions {
                    phase: Some("scope".to_string()),
                    strict: true,
                    ..Default::default()
                },
            ).unwrap();
            assert_eq!(status, CommandStatus::Failed);

            write(&dir.path().join("delivery/scope.md"), "# scope");
            let status = commands::check_artifacts(
                &layout,
                &ArtifactCheckOptions {
                    phase: Some("scope".to_string()),
                    strict: true,
                    ..Default::default()
                },
            ).unwrap();
            assert_eq!(status, CommandStatus::Success);
        }

        it "creates placeholders for missing artifacts" {
            let (dir, layout) = setup_project();

            let status = commands::check_artifacts(
                &layout,
                &ArtifactCheckOptions { strict: true, create_missing: true, ..Default::default() },
            ).unwrap();

            assert_eq!(status, CommandStatus::Success);
            let placeholder = std::fs::read_to_string(dir.path().join("delivery/setup.md")).unwrap();
            assert!(placeholder.starts_with("# setup.md"));
            assert!(dir.path().join("config/config.yml").exists());
        }

        it "succeeds for a phase with no artifacts" {
            let (_dir, layout) = setup_project();

            let status = commands::check_artifacts(
                &layout,
                &ArtifactCheckOptions {
                    phase: Some("unlisted".to_string()),
                    strict: true,
                    ..Default::default()
                },
            ).unwrap();

            assert_eq!(status, CommandStatus::Success);
        }
    }

    describe "check_todo" {
        before {
            let (_dir, layout) = setup_project();
        }

        it "reports unchecked items without failing by default" {
            write(&layout.checklist_for("build"), CHECKLIST);

            let status = commands::check_todo(&layout, &ChecklistOptions::default()).unwrap();

            assert_eq!(status, CommandStatus::Success);
        }

        it "fails on unchecked items in strict mode" {
            write(&layout.checklist_for("build"), CHECKLIST);

            let status = commands::check_todo(&layout, &ChecklistOptions { strict: true }).unwrap();

            assert_eq!(status, CommandStatus::Failed);
        }

        it "passes once every item is checked" {
            write(&layout.checklist_for("build"), &CHECKLIST.replace("[ ]", "[x]"));

            let status = commands::check_todo(&layout, &ChecklistOptions { strict: true }).unwrap();

            assert_eq!(status, CommandStatus::Success);
        }

        it "errors when the checklist for the mode is missing" {
            let result = commands::check_todo(&layout, &ChecklistOptions::default());

            assert!(result.unwrap_err().to_string().contains("Checklist file not found"));
        }
    }
}
