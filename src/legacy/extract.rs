//! Per-format field extraction. Defaults are not applied here.

use serde_json::Value;

use crate::error::{Result, SessionError};
use crate::models::{PartialSessionState, TaskRef};

const HEADER_DELIMITER: &str = "---";

pub(super) fn structured_literal(text: &str) -> Result<PartialSessionState> {
    let value: Value = serde_json::from_str(text.trim())?;
    project(&value, "structured literal")
}

/// YAML between the first two `---` delimiters; anything after is prose.
pub(super) fn delimited_header(text: &str) -> Result<PartialSessionState> {
    let mut segments = text.splitn(3, HEADER_DELIMITER);
    let _preamble = segments.next();
    let header = segments
        .next()
        .map(str::trim)
        .filter(|header| !header.is_empty())
        .ok_or(SessionError::EmptyExtraction {
            format: "delimited-header",
        })?;

    let value: Value =
        serde_yaml::from_str(header).map_err(|e| SessionError::yaml("delimited header", e))?;
    if value.is_null() {
        return Err(SessionError::EmptyExtraction {
            format: "delimited-header",
        });
    }
    project(&value, "delimited header")
}

pub(super) fn headed_sections(text: &str) -> Result<PartialSessionState> {
    let mut state = PartialSessionState::default();
    let mut heading: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if line.starts_with("# ") || line.starts_with("## ") {
            let name = line.trim_start_matches(|c| c == '#' || c == ' ');
            heading = Some(name.to_lowercase());
            continue;
        }
        let Some(current) = heading.as_deref() else {
            continue;
        };
        if line.is_empty() {
            continue;
        }

        match current {
            "mode" => state.mode = Some(line.to_string()),
            "phase" => state.phase = Some(line.to_string()),
            "agent" => state.agent = Some(line.to_string()),
            "task" => {
                if let Some((key, value)) = line.split_once(':') {
                    let task = state.task.get_or_insert_with(TaskRef::default);
                    if !task.set(key.trim(), value.trim()) {
                        tracing::debug!(key = key.trim(), "ignoring unknown task field");
                    }
                }
            }
            _ if current.contains("decision") => {
                if let Some(item) = line.strip_prefix("- ") {
                    state
                        .decisions
                        .get_or_insert_with(Vec::new)
                        .push(item.to_string());
                }
            }
            _ if current.contains("next") => {
                if let Some(item) = line.strip_prefix("- ") {
                    state
                        .next_steps
                        .get_or_insert_with(Vec::new)
                        .push(item.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(state)
}

/// `key=value` lines. An empty list value yields `[""]`.
pub(super) fn key_value_lines(text: &str) -> Result<PartialSessionState> {
    let mut state = PartialSessionState::default();

    for line in text.lines().map(str::trim) {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = strip_matching_quotes(value.trim());

        match key {
            "mode" => state.mode = Some(value.to_string()),
            "phase" => state.phase = Some(value.to_string()),
            "agent" => state.agent = Some(value.to_string()),
            "decisions" => state.decisions = Some(split_list(value)),
            "next_steps" => state.next_steps = Some(split_list(value)),
            _ => {
                if let Some(task_key) = key.strip_prefix("task.") {
                    let task = state.task.get_or_insert_with(TaskRef::default);
                    if !task.set(task_key, value) {
                        tracing::debug!(key = task_key, "ignoring unknown task field");
                    }
                }
            }
        }
    }

    Ok(state)
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|item| item.trim().to_string()).collect()
}

fn project(value: &Value, context: &str) -> Result<PartialSessionState> {
    let Value::Object(fields) = value else {
        return Err(SessionError::NotAMapping {
            context: context.to_string(),
        });
    };

    Ok(PartialSessionState {
        mode: fields.get("mode").and_then(scalar_text),
        phase: fields.get("phase").and_then(scalar_text),
        agent: fields.get("agent").and_then(scalar_text),
        task: fields.get("task").and_then(task_from_value),
        decisions: fields.get("decisions").and_then(string_list),
        next_steps: fields.get("next_steps").and_then(string_list),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn task_from_value(value: &Value) -> Option<TaskRef> {
    let Value::Object(fields) = value else {
        return None;
    };
    let mut task = TaskRef::default();
    for (key, value) in fields {
        if let Some(text) = scalar_text(value) {
            task.set(key, text);
        }
    }
    Some(task)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_JSON: &str = r#"{
    "mode": "build",
    "phase": "enablement",
    "agent": "conductor",
    "task": {
        "issue_number": 1,
        "title": "Legacy task",
        "status": "In progress"
    },
    "decisions": ["Legacy decision 1", "Legacy decision 2"],
    "next_steps": ["Legacy step 1", "Legacy step 2"]
}"#;

    const LEGACY_FRONTMATTER: &str = "---
mode: build
phase: enablement
agent: conductor
task:
  issue_number: 1
  title: Legacy task
  status: In progress
decisions:
  - Legacy decision 1
  - Legacy decision 2
next_steps:
  - Legacy step 1
  - Legacy step 2
---

# Legacy Session Content

This is the legacy session content.
";

    #[test]
    fn test_structured_literal_projection() {
        let state = structured_literal(LEGACY_JSON).unwrap();
        assert_eq!(state.mode.as_deref(), Some("build"));
        let task = state.task.unwrap();
        assert_eq!(task.issue_number.as_deref(), Some("1"));
        assert_eq!(task.title.as_deref(), Some("Legacy task"));
        assert_eq!(task.url, None);
        assert_eq!(state.decisions.unwrap().len(), 2);
        assert_eq!(state.next_steps.unwrap()[1], "Legacy step 2");
    }

    #[test]
    fn test_structured_literal_nulls_are_absent() {
        let text = r#"{"mode": "build", "phase": null, "task": null, "decisions": null, "next_steps": []}"#;
        let state = structured_literal(text).unwrap();
        assert_eq!(state.phase, None);
        assert_eq!(state.task, None);
        assert_eq!(state.decisions, None);
        assert_eq!(state.next_steps, Some(vec![]));
    }

    #[test]
    fn test_structured_literal_invalid_json() {
        let err = structured_literal("{invalid json}").unwrap_err();
        assert!(matches!(err, SessionError::InvalidJson(_)));
    }

    #[test]
    fn test_delimited_header_projection() {
        let state = delimited_header(LEGACY_FRONTMATTER).unwrap();
        assert_eq!(state.phase.as_deref(), Some("enablement"));
        assert_eq!(state.task.unwrap().status.as_deref(), Some("In progress"));
        assert!(state
            .decisions
            .unwrap()
            .contains(&"Legacy decision 1".to_string()));
    }

    #[test]
    fn test_delimited_header_minimal() {
        let state = delimited_header("---\nmode: build\n---\n\n# Content\n").unwrap();
        assert_eq!(state.mode.as_deref(), Some("build"));
        assert_eq!(state.phase, None);
    }

    #[test]
    fn test_delimited_header_invalid_yaml() {
        let err = delimited_header("---\nmode: build\ninvalid_yaml: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, SessionError::InvalidYaml { .. }));
    }

    #[test]
    fn test_delimited_header_without_delimiters() {
        let err = delimited_header("mode: build\nphase: enablement\n").unwrap_err();
        assert!(matches!(err, SessionError::EmptyExtraction { .. }));
    }

    #[test]
    fn test_delimited_header_empty_segment() {
        let err = delimited_header("---\n---\nmode: build").unwrap_err();
        assert!(matches!(err, SessionError::EmptyExtraction { .. }));
    }

    #[test]
    fn test_headed_sections() {
        let text = "# Session Context

## Mode
build

## Phase
discovery

## Agent
onboarder

## Task
issue_number: 5
title: Markdown task
owner: nobody

## Key Decisions
- Decision 1
- Decision 2

## Next Steps
- Step 1
";
        let state = headed_sections(text).unwrap();
        assert_eq!(state.mode.as_deref(), Some("build"));
        assert_eq!(state.phase.as_deref(), Some("discovery"));
        assert_eq!(state.agent.as_deref(), Some("onboarder"));
        let task = state.task.unwrap();
        assert_eq!(task.issue_number.as_deref(), Some("5"));
        assert_eq!(task.title.as_deref(), Some("Markdown task"));
        assert_eq!(
            state.decisions,
            Some(vec!["Decision 1".to_string(), "Decision 2".to_string()])
        );
        assert_eq!(state.next_steps, Some(vec!["Step 1".to_string()]));
    }

    #[test]
    fn test_headed_sections_last_scalar_wins() {
        let state = headed_sections("# S\n## Mode\nbuild\ndiscover\n").unwrap();
        assert_eq!(state.mode.as_deref(), Some("discover"));
    }

    #[test]
    fn test_headed_sections_empty_sections() {
        let state = headed_sections("# S\n## Mode\n\n## Decisions\n\n").unwrap();
        assert_eq!(state, PartialSessionState::default());
    }

    #[test]
    fn test_key_value_lines() {
        let text = "mode=build
phase=enablement
agent=conductor
task.issue_number=1
task.title=Test task
decisions=Decision 1,Decision 2
next_steps=Step 1, Step 2
";
        let state = key_value_lines(text).unwrap();
        assert_eq!(state.agent.as_deref(), Some("conductor"));
        let task = state.task.unwrap();
        assert_eq!(task.issue_number.as_deref(), Some("1"));
        assert_eq!(task.title.as_deref(), Some("Test task"));
        assert_eq!(
            state.decisions,
            Some(vec!["Decision 1".to_string(), "Decision 2".to_string()])
        );
        assert_eq!(
            state.next_steps,
            Some(vec!["Step 1".to_string(), "Step 2".to_string()])
        );
    }

    #[test]
    fn test_key_value_strips_one_quote_layer() {
        let state = key_value_lines("mode=\"build\"\nphase='scope'\nagent=\"'lab'\"\n").unwrap();
        assert_eq!(state.mode.as_deref(), Some("build"));
        assert_eq!(state.phase.as_deref(), Some("scope"));
        assert_eq!(state.agent.as_deref(), Some("'lab'"));
    }

    #[test]
    fn test_key_value_splits_on_first_equals() {
        let state = key_value_lines("task.url=https://x.test/?a=b\nmode=build").unwrap();
        assert_eq!(
            state.task.unwrap().url.as_deref(),
            Some("https://x.test/?a=b")
        );
    }
}
