//! Moving a session document to its next phase.
//!
//! This is a pure transformation of the document text; loading and saving
//! belong to the caller so a dry run computes exactly what a real run writes.

use chrono::NaiveDateTime;
use serde_yaml::{Mapping, Value};

use super::PhaseGraph;
use crate::document::{
    replace_section, scalar_field, Document, CURRENT_WORK, SESSION_METADATA, SESSION_NOTES,
};
use crate::error::{Result, SessionError};
use crate::render::TIMESTAMP_FORMAT;

/// A computed phase change, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: String,
    pub to: String,
    pub mode: Option<String>,
    pub owner: Option<String>,
    /// The full rewritten document.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced(PhaseTransition),
    /// The current phase has no successor and no phase was forced.
    PipelineComplete { phase: String },
}

fn decision_record(phase: &str) -> String {
    format!("Advanced to {} phase via conductor automation", phase)
}

fn next_steps_for(phase: &str) -> Vec<Value> {
    vec![
        Value::String(format!("Begin {} phase activities", phase)),
        Value::String(format!("Review {} checklist requirements", phase)),
        Value::String("Update task assignments for new phase".to_string()),
    ]
}

fn dump(mapping: Mapping, section: &str) -> Result<String> {
    serde_yaml::to_string(&Value::Mapping(mapping))
        .map_err(|e| SessionError::yaml(format!("{} section", section), e))
}

fn set(mapping: &mut Mapping, key: &str, value: Value) {
    mapping.insert(Value::String(key.to_string()), value);
}

/// Advance the session in `content` to the next phase.
///
/// `force_phase` bypasses the graph's successor lookup but must still name a
/// phase in the table. Sections are rewritten one after another; Session
/// Metadata and Session Notes are only touched when they carry a block.
pub fn advance_session(
    content: &str,
    graph: &PhaseGraph,
    force_phase: Option<&str>,
    now: NaiveDateTime,
) -> Result<AdvanceOutcome> {
    let document = Document::parse(content);

    let mut current_work = document
        .block_mapping(CURRENT_WORK)?
        .ok_or_else(|| SessionError::SectionMissing(CURRENT_WORK.to_string()))?;
    let current_phase =
        scalar_field(&current_work, "phase").ok_or(SessionError::MissingField {
            section: CURRENT_WORK,
            field: "phase",
        })?;
    tracing::info!("Current phase: {}", current_phase);

    let next_phase = match force_phase {
        Some(forced) => {
            tracing::info!("Forcing advance to phase: {}", forced);
            forced.to_string()
        }
        None => match graph.get_next_phase(&current_phase) {
            Some(next) => next.to_string(),
            None => {
                return Ok(AdvanceOutcome::PipelineComplete {
                    phase: current_phase,
                })
            }
        },
    };

    let next_info = graph
        .get_phase_info(&next_phase)
        .ok_or_else(|| SessionError::PhaseNotFound(next_phase.clone()))?;

    set(&mut current_work, "phase", Value::String(next_phase.clone()));
    if let Some(mode) = &next_info.mode {
        set(&mut current_work, "mode", Value::String(mode.clone()));
    }
    let mode = scalar_field(&current_work, "mode");

    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    let metadata = document.block_mapping(SESSION_METADATA)?.map(|mut metadata| {
        set(&mut metadata, "last_updated", Value::String(timestamp));
        metadata
    });

    let notes = document.block_mapping(SESSION_NOTES)?.map(|mut notes| {
        let mut decisions = match notes.get("decisions") {
            Some(Value::Sequence(items)) => items.clone(),
            _ => Vec::new(),
        };
        decisions.push(Value::String(decision_record(&next_phase)));
        set(&mut notes, "decisions", Value::Sequence(decisions));
        set(
            &mut notes,
            "next_steps",
            Value::Sequence(next_steps_for(&next_phase)),
        );
        notes
    });

    let mut updated = replace_section(content, CURRENT_WORK, &dump(current_work, CURRENT_WORK)?);
    let rewritten = Document::parse(&updated).current_work()?;
    if scalar_field(&rewritten, "phase").as_deref() != Some(next_phase.as_str()) {
        return Err(SessionError::RewriteFailed(CURRENT_WORK.to_string()));
    }
    if let Some(metadata) = metadata {
        updated = replace_section(&updated, SESSION_METADATA, &dump(metadata, SESSION_METADATA)?);
    }
    if let Some(notes) = notes {
        updated = replace_section(&updated, SESSION_NOTES, &dump(notes, SESSION_NOTES)?);
    }

    Ok(AdvanceOutcome::Advanced(PhaseTransition {
        from: current_phase,
        to: next_phase,
        mode,
        owner: next_info.owner.clone(),
        content: updated,
    }))
}
