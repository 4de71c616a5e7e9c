//! Markdown plan extractor
//!
//! Turns a plan document into plain data the runner can execute:
//!
//! - Checkbox tasks: `- [ ] text` (pending) and `- [x] text` (complete,
//!   case-insensitive marker)
//! - Phase headings: `## Phase <n>: <title>`
//! - Inline priority markers `(CRITICAL|HIGH|MEDIUM|LOW)`, stripped from the
//!   task title and recorded separately
//! - Heading levels 1-6 for the document title and outline
//!
//! Task ids are `<phase-id>.<ordinal>` with a 1-based ordinal within the
//! phase. Tasks appearing before any phase heading land in an implicit
//! phase with id `"0"`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::runner::TaskIdentity;

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"^(#{1,6})\s+(.+?)\s*$").unwrap();
    static ref PHASE_RE: Regex = Regex::new(r"(?i)^##\s+phase\s+(\d+)\s*:\s*(.+?)\s*$").unwrap();
    static ref CHECKBOX_RE: Regex = Regex::new(r"^\s*-\s*\[([ xX])\]\s+(.+?)\s*$").unwrap();
    static ref PRIORITY_RE: Regex = Regex::new(r"\s*\((CRITICAL|HIGH|MEDIUM|LOW)\)").unwrap();
}

/// Task priority parsed from an inline marker; `Medium` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CRITICAL" => Ok(Self::Critical),
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(format!("unknown priority: {s}")),
        }
    }
}

/// A single checkbox task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: String,
    pub title: String,
    pub complete: bool,
    pub priority: Priority,
}

impl TaskIdentity for PlanTask {
    fn task_id(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

/// A phase grouping consecutive tasks under a `## Phase <n>: <title>` heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub tasks: Vec<PlanTask>,
}

/// A heading found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Parsed plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Text of the first level-1 heading, when present.
    pub title: Option<String>,
    /// Every heading in document order, levels 1-6.
    pub outline: Vec<Heading>,
    pub phases: Vec<Phase>,
}

impl PlanDocument {
    /// Parse a markdown plan document.
    pub fn parse(input: &str) -> Self {
        let mut title = None;
        let mut outline = Vec::new();
        let mut phases: Vec<Phase> = Vec::new();
        let mut current: Option<Phase> = None;

        for line in input.lines() {
            if let Some(caps) = HEADING_RE.captures(line) {
                let level = caps[1].len() as u8;
                let text = caps[2].to_string();
                if level == 1 && title.is_none() {
                    title = Some(text.clone());
                }
                outline.push(Heading { level, text });

                if let Some(caps) = PHASE_RE.captures(line) {
                    if let Some(phase) = current.take() {
                        phases.push(phase);
                    }
                    current = Some(Phase {
                        id: caps[1].to_string(),
                        name: caps[2].to_string(),
                        tasks: Vec::new(),
                    });
                }
                continue;
            }

            if let Some(caps) = CHECKBOX_RE.captures(line) {
                let complete = !caps[1].trim().is_empty();
                let (title, priority) = split_priority(&caps[2]);

                // Tasks before any phase heading go into an implicit phase
                let phase = current.get_or_insert_with(|| Phase {
                    id: "0".to_string(),
                    name: "Tasks".to_string(),
                    tasks: Vec::new(),
                });
                let id = format!("{}.{}", phase.id, phase.tasks.len() + 1);
                phase.tasks.push(PlanTask {
                    id,
                    title,
                    complete,
                    priority,
                });
            }
        }

        if let Some(phase) = current.take() {
            phases.push(phase);
        }

        Self {
            title,
            outline,
            phases,
        }
    }

    /// Total number of tasks across all phases.
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }

    /// Tasks not yet checked off, in document order.
    pub fn pending_tasks(&self) -> Vec<&PlanTask> {
        self.phases
            .iter()
            .flat_map(|p| p.tasks.iter())
            .filter(|t| !t.complete)
            .collect()
    }
}

/// Strip the first inline priority marker from a task title.
fn split_priority(raw: &str) -> (String, Priority) {
    let priority = PRIORITY_RE
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or_default();
    let title = PRIORITY_RE.replace(raw, "").trim().to_string();
    (title, priority)
}
