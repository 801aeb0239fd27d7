//! Canonical session document rendering.
//!
//! Output is fully determined by the state and the [`RenderContext`]; the
//! only moving parts are the timestamp and the session id derived from it.
//! Nothing here re-parses its own output.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::models::{CanonicalSessionState, DEFAULT_AGENT, DEFAULT_MODE, DEFAULT_PHASE};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SESSION_ID_FORMAT: &str = "%Y-%m-%d-%H%M%S";

const MODE_COMMENT: &str = "# intake|discover|scope|design|build|evaluate|deliver|operate|improve";
const PHASE_COMMENT: &str = "# From pipeline.yml phases";
const AGENT_COMMENT: &str = "# conductor|onboarder|lab|studio|ops|evaluator|improver";

const DEFAULT_ISSUE_NUMBER: &str = "unknown";
const DEFAULT_TASK_TITLE: &str = "Migrated from legacy session";
const DEFAULT_TASK_URL: &str = "https://github.com/example/repo/issues/1";
const DEFAULT_TASK_PRIORITY: &str = "now";
const DEFAULT_TASK_STATUS: &str = "In progress";
const DECISIONS_PLACEHOLDER: &str = "Migrated from legacy session format";
const NEXT_STEPS_PLACEHOLDER: &str = "Review and update session context";

/// Everything the renderer needs besides the session state itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub working_directory: PathBuf,
    pub now: NaiveDateTime,
    pub operator: String,
    pub assistant: String,
}

impl RenderContext {
    pub fn new(working_directory: impl AsRef<Path>, now: NaiveDateTime) -> Self {
        Self {
            working_directory: working_directory.as_ref().to_path_buf(),
            now,
            operator: "unknown".to_string(),
            assistant: "unknown".to_string(),
        }
    }

    pub fn with_identity(mut self, operator: impl Into<String>, assistant: impl Into<String>) -> Self {
        self.operator = operator.into();
        self.assistant = assistant.into();
        self
    }
}

/// Escape text for a double-quoted YAML scalar.
///
/// Control characters become YAML escapes, so the value always stays on one
/// line and cannot close the surrounding fence.
pub fn escape_quotes(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_quotes(text))
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn render_issue_number(issue_number: Option<&str>) -> String {
    match issue_number {
        None => DEFAULT_ISSUE_NUMBER.to_string(),
        Some(n) if n.parse::<u64>().is_ok() => n.to_string(),
        Some(other) => quoted(other),
    }
}

fn render_list(items: &[String], placeholder: &str) -> String {
    if items.is_empty() {
        return format!("  - {}", quoted(placeholder));
    }
    items
        .iter()
        .map(|item| format!("  - {}", quoted(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full canonical session document.
pub fn render_session(state: &CanonicalSessionState, ctx: &RenderContext) -> String {
    let timestamp = ctx.now.format(TIMESTAMP_FORMAT).to_string();
    let session_id = ctx.now.format(SESSION_ID_FORMAT).to_string();
    let task = &state.task;

    let mode = quoted(or_default(&state.mode, DEFAULT_MODE));
    let phase = quoted(or_default(&state.phase, DEFAULT_PHASE));
    let agent = quoted(or_default(&state.agent, DEFAULT_AGENT));
    let issue_number = render_issue_number(task.issue_number.as_deref());
    let title = quoted(task.title.as_deref().unwrap_or(DEFAULT_TASK_TITLE));
    let url = quoted(task.url.as_deref().unwrap_or(DEFAULT_TASK_URL));
    let priority = quoted(task.priority.as_deref().unwrap_or(DEFAULT_TASK_PRIORITY));
    let status = quoted(task.status.as_deref().unwrap_or(DEFAULT_TASK_STATUS));
    let decisions = render_list(&state.decisions, DECISIONS_PLACEHOLDER);
    let next_steps = render_list(&state.next_steps, NEXT_STEPS_PLACEHOLDER);
    let working_directory = quoted(&ctx.working_directory.display().to_string());

    format!(
        r#"# Active Session Context

## Session Metadata
```yaml
session_id: "{session_id}"
started_at: "{timestamp}"
last_updated: "{timestamp}"
operator: {operator}
assistant: {assistant}
```

## Current Work
```yaml
mode: {mode}  {MODE_COMMENT}
phase: {phase}  {PHASE_COMMENT}
agent: {agent}  {AGENT_COMMENT}
task:
  issue_number: {issue_number}
  title: {title}
  url: {url}
  priority: {priority}
  status: {status}
branch: "main"
```

## Task Context
```yaml
parent_crd:
  issue_number: null
  title: null
  url: null
parent_prd:
  issue_number: null
  title: null
  url: null
project:
  id: null
  name: "Migrated Project"
  url: null
```

## Work Progress
```yaml
todos:
  - content: "Review migrated session context"
    status: "pending"
    priority: "high"
    id: "1"
  - content: "Update session metadata with correct information"
    status: "pending"
    priority: "medium"
    id: "2"
```

## Artifacts
```yaml
created_files: []
modified_files: []
dependencies: []
```

## Session Notes
```yaml
decisions:
{decisions}
blockers: []
next_steps:
{next_steps}
handoff_requirements: []
```

## Git Context
```yaml
repository: "unknown"
current_branch: "main"
working_directory: {working_directory}
uncommitted_changes: false
last_commit: "unknown"
```

## Tool Access
```yaml
allowed_tools:
  - "Read"
  - "Write"
  - "TodoWrite"
  - "Bash(git:*)"
  - "Bash(gh:*)"
  - "Bash(python:*)"
  - "Bash(test:*)"
restricted_tools: []
```

---

## Schema Definition

This file follows the session context schema:

### Required Fields
- `session_id`: Unique identifier for the session
- `started_at`: Timestamp when the session began
- `operator`: GitHub username of the human operator
- `mode`: Current operating mode from pipeline.yml
- `phase`: Current phase from pipeline.yml
- `agent`: Current agent role from pipeline.yml
- `task`: Current GitHub issue being worked on

### Optional Fields
- `parent_crd`: Reference to parent CRD issue if applicable
- `parent_prd`: Reference to parent PRD issue if applicable
- `todos`: Current todo list for tracking progress
- `artifacts`: Files created/modified during session
- `decisions`: Key decisions made during session
- `blockers`: Any blockers encountered
- `next_steps`: Planned next actions
- `handoff_requirements`: Items needed for agent handoff

### Update Requirements
- Update `last_updated` timestamp on any changes
- Update `todos` when the todo list changes
- Update `artifacts` when files are created/modified
- Add to `decisions` for any significant choices made
- Add to `blockers` for any impediments encountered
"#,
        operator = quoted(&ctx.operator),
        assistant = quoted(&ctx.assistant),
    )
}
