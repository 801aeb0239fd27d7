use serde::{Deserialize, Serialize};

pub const DEFAULT_MODE: &str = "build";
pub const DEFAULT_PHASE: &str = "enablement";
pub const DEFAULT_AGENT: &str = "conductor";

/// Normalized session state.
///
/// `mode`, `phase` and `agent` are always populated once a legacy record has
/// gone through [`PartialSessionState::into_canonical`]. Empty `decisions` and
/// `next_steps` stay empty here; placeholder text is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSessionState {
    pub mode: String,
    pub phase: String,
    pub agent: String,
    #[serde(default)]
    pub task: TaskRef,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// The issue the session is currently working on.
///
/// Every field is optional; an all-`None` value is the empty task mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub issue_number: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl TaskRef {
    /// Set a field by its schema key. Returns `false` for keys outside the schema.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key {
            "issue_number" => &mut self.issue_number,
            "title" => &mut self.title,
            "url" => &mut self.url,
            "priority" => &mut self.priority,
            "status" => &mut self.status,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Fields a legacy extractor recovered, each `None` when the source was silent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSessionState {
    pub mode: Option<String>,
    pub phase: Option<String>,
    pub agent: Option<String>,
    pub task: Option<TaskRef>,
    pub decisions: Option<Vec<String>>,
    pub next_steps: Option<Vec<String>>,
}

impl PartialSessionState {
    /// Apply the defaults shared by every legacy format.
    ///
    /// Only absent values are defaulted: an explicitly empty `phase` stays empty.
    pub fn into_canonical(self) -> CanonicalSessionState {
        CanonicalSessionState {
            mode: self.mode.unwrap_or_else(|| DEFAULT_MODE.to_string()),
            phase: self.phase.unwrap_or_else(|| DEFAULT_PHASE.to_string()),
            agent: self.agent.unwrap_or_else(|| DEFAULT_AGENT.to_string()),
            task: self.task.unwrap_or_default(),
            decisions: self.decisions.unwrap_or_default(),
            next_steps: self.next_steps.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_absent_fields() {
        let state = PartialSessionState::default().into_canonical();
        assert_eq!(state.mode, "build");
        assert_eq!(state.phase, "enablement");
        assert_eq!(state.agent, "conductor");
        assert!(state.task.is_empty());
        assert!(state.decisions.is_empty());
        assert!(state.next_steps.is_empty());
    }

    #[test]
    fn test_empty_values_are_preserved() {
        let state = PartialSessionState {
            phase: Some(String::new()),
            decisions: Some(vec![String::new()]),
            ..Default::default()
        }
        .into_canonical();
        assert_eq!(state.phase, "");
        assert_eq!(state.decisions, vec![String::new()]);
    }

    #[test]
    fn test_task_set_ignores_unknown_keys() {
        let mut task = TaskRef::default();
        assert!(task.set("title", "Ship it"));
        assert!(!task.set("assignee", "someone"));
        assert_eq!(task.title.as_deref(), Some("Ship it"));
    }
}
