//! Command implementations behind the `vt` binary.
//!
//! Each command loads what it needs fresh from disk, computes, and writes at
//! most once at the end. Dry runs compute identically and skip that write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::checks;
use crate::config::ProjectLayout;
use crate::document::{scalar_field, SessionStore, CURRENT_WORK};
use crate::error::SessionError;
use crate::legacy;
use crate::pipeline::{advance_session, AdvanceOutcome, PhaseGraph};
use crate::render::{render_session, RenderContext};

const PREVIEW_LIMIT: usize = 1000;
const RULE_WIDTH: usize = 50;

/// How a command finished when it did not hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// A soft failure escalated by `--strict`.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct AdvanceOptions {
    pub dry_run: bool,
    pub force_phase: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub legacy_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub dry_run: bool,
    pub backup: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactCheckOptions {
    pub phase: Option<String>,
    pub strict: bool,
    pub create_missing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChecklistOptions {
    pub strict: bool,
}

fn print_ruled(content: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{}", rule);
    println!("{}", content);
    println!("{}", rule);
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_LIMIT {
        let head: String = content.chars().take(PREVIEW_LIMIT).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

fn current_field(layout: &ProjectLayout, field: &'static str) -> Result<String> {
    let document = SessionStore::open(&layout.session_file).load_document()?;
    let current_work = document.current_work()?;
    let value = scalar_field(&current_work, field).ok_or(SessionError::MissingField {
        section: CURRENT_WORK,
        field,
    })?;
    Ok(value)
}

/// Move the session document to the next phase.
pub fn advance(
    layout: &ProjectLayout,
    options: &AdvanceOptions,
    now: NaiveDateTime,
) -> Result<CommandStatus> {
    tracing::info!("Starting conductor phase advancement...");

    let graph = PhaseGraph::load(&layout.pipeline_file)?;
    let store = SessionStore::open(&layout.session_file);
    let content = store.load()?;

    let transition = match advance_session(&content, &graph, options.force_phase.as_deref(), now)? {
        AdvanceOutcome::Advanced(transition) => transition,
        AdvanceOutcome::PipelineComplete { phase } => {
            tracing::info!("No next phase found for '{}' - pipeline complete!", phase);
            return Ok(CommandStatus::Success);
        }
    };

    tracing::info!("Advancing to phase: {}", transition.to);
    tracing::info!(
        "Next phase mode: {}",
        transition.mode.as_deref().unwrap_or("unchanged")
    );
    tracing::info!(
        "Next phase owner: {}",
        transition.owner.as_deref().unwrap_or("unassigned")
    );

    if options.dry_run {
        tracing::info!("DRY RUN - Would update session document with new phase information");
        print_ruled(&preview(&transition.content));
    } else {
        store.save(&transition.content)?;
        tracing::info!("Session advanced from {} to {}", transition.from, transition.to);
    }

    tracing::info!("Conductor phase advancement complete.");
    Ok(CommandStatus::Success)
}

/// Convert a legacy session file into a canonical session document.
pub fn migrate(
    layout: &ProjectLayout,
    options: &MigrateOptions,
    now: NaiveDateTime,
) -> Result<CommandStatus> {
    tracing::info!("Starting legacy session migration...");

    if !options.legacy_file.exists() {
        return Err(SessionError::ConfigMissing {
            what: "Legacy file",
            path: options.legacy_file.clone(),
        }
        .into());
    }
    let legacy_content = std::fs::read_to_string(&options.legacy_file).with_context(|| {
        format!(
            "Error reading legacy file {}",
            options.legacy_file.display()
        )
    })?;
    tracing::info!("Read legacy file: {}", options.legacy_file.display());

    let format = legacy::classify(&legacy_content);
    tracing::info!("Detected legacy format: {}", format);

    let state = legacy::normalize_as(format, &legacy_content)?;
    tracing::info!(
        mode = %state.mode,
        phase = %state.phase,
        agent = %state.agent,
        "Parsed legacy data"
    );

    let ctx = RenderContext::new(&layout.root, now)
        .with_identity(layout.operator.clone(), layout.assistant.clone());
    let rendered = render_session(&state, &ctx);

    let output = options
        .output_file
        .clone()
        .unwrap_or_else(|| layout.session_file.clone());
    let store = SessionStore::open(output);

    if options.backup {
        store.backup()?;
    }

    if options.dry_run {
        tracing::info!("DRY RUN - Would create {}:", store.path().display());
        print_ruled(&rendered);
    } else {
        store.save(&rendered)?;
        tracing::info!("Created new session document: {}", store.path().display());
    }

    tracing::info!("Legacy session migration complete!");
    Ok(CommandStatus::Success)
}

/// Verify the artifacts required by a phase exist.
pub fn check_artifacts(
    layout: &ProjectLayout,
    options: &ArtifactCheckOptions,
) -> Result<CommandStatus> {
    tracing::info!("Starting artifact validation...");

    let graph = PhaseGraph::load(&layout.pipeline_file)?;
    let phase = match &options.phase {
        Some(phase) => phase.clone(),
        None => current_field(layout, "phase")?,
    };
    tracing::info!("Current phase: {}", phase);

    let required = graph.phase_artifacts(&phase);
    if required.is_empty() {
        tracing::info!("No artifacts required for phase '{}'", phase);
        return Ok(CommandStatus::Success);
    }
    tracing::info!("Required artifacts: {:?}", required);

    let resolved = checks::resolve_artifact_paths(layout.root(), required, graph.artifact_paths());
    let missing = checks::missing_artifacts(&resolved);

    if missing.is_empty() {
        tracing::info!("All required artifacts are present!");
        tracing::info!("Artifact validation complete.");
        return Ok(CommandStatus::Success);
    }

    tracing::error!("Found {} missing artifacts:", missing.len());
    for path in &missing {
        tracing::error!("  Missing: {}", path.display());
    }

    if options.create_missing {
        tracing::info!("Creating placeholder files for missing artifacts...");
        for path in &missing {
            checks::create_placeholder(path)?;
            tracing::info!("  Created: {}", path.display());
        }
    } else if options.strict {
        tracing::error!("Failing due to missing artifacts (--strict mode)");
        return Ok(CommandStatus::Failed);
    } else {
        tracing::warn!("Missing artifacts found but not failing (use --strict to fail)");
    }

    tracing::info!("Artifact validation complete.");
    Ok(CommandStatus::Success)
}

/// Report unchecked items in the current mode's checklist.
pub fn check_todo(layout: &ProjectLayout, options: &ChecklistOptions) -> Result<CommandStatus> {
    tracing::info!("Starting todo checklist validation...");

    let mode = current_field(layout, "mode")?;
    tracing::info!("Current mode: {}", mode);

    let checklist_path = layout.checklist_for(&mode);
    tracing::info!("Checking checklist: {}", checklist_path.display());
    let content = checks::load_checklist(&checklist_path)?;

    let unchecked = checks::scan_unchecked(&content);
    if unchecked.is_empty() {
        tracing::info!("All checklist items are completed!");
        tracing::info!("Todo checklist validation complete.");
        return Ok(CommandStatus::Success);
    }

    tracing::error!(
        "Found {} unchecked items in {}:",
        unchecked.len(),
        checklist_path.display()
    );
    for item in &unchecked {
        tracing::error!("  Line {}: {}", item.line_number, item.text);
    }

    if options.strict {
        tracing::error!("Failing due to unchecked items (--strict mode)");
        return Ok(CommandStatus::Failed);
    }
    tracing::warn!("Unchecked items found but not failing (use --strict to fail)");

    tracing::info!("Todo checklist validation complete.");
    Ok(CommandStatus::Success)
}
