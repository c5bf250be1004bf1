//! Exploration tasks.

use serde::{Deserialize, Serialize};

use super::CandidateElement;

/// Kind of browser action a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    Click,
}

/// A unit of work on the exploration frontier.
///
/// A `Click` first returns to `url` (the page the element was seen on), then
/// clicks the element's bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ExplorationTask {
    Navigate { url: String },
    Click { url: String, element: CandidateElement },
}

impl ExplorationTask {
    pub fn navigate(url: impl Into<String>) -> Self {
        ExplorationTask::Navigate { url: url.into() }
    }

    pub fn click(url: impl Into<String>, element: CandidateElement) -> Self {
        ExplorationTask::Click {
            url: url.into(),
            element,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ExplorationTask::Navigate { .. } => ActionKind::Navigate,
            ExplorationTask::Click { .. } => ActionKind::Click,
        }
    }

    /// URL the task starts from.
    pub fn url(&self) -> &str {
        match self {
            ExplorationTask::Navigate { url } | ExplorationTask::Click { url, .. } => url,
        }
    }

    pub fn element(&self) -> Option<&CandidateElement> {
        match self {
            ExplorationTask::Navigate { .. } => None,
            ExplorationTask::Click { element, .. } => Some(element),
        }
    }

    /// Identity of the action used to reject duplicate enqueues.
    pub fn signature(&self) -> String {
        match self {
            ExplorationTask::Navigate { url } => format!("navigate|{}", url),
            ExplorationTask::Click { url, element } => {
                let b = element.bounds;
                format!(
                    "click|{}|{}|{:.0},{:.0},{:.0},{:.0}",
                    url,
                    element.purpose.to_lowercase(),
                    b.x,
                    b.y,
                    b.width,
                    b.height
                )
            }
        }
    }

    /// One-line description for logs and manual steps.
    pub fn describe(&self) -> String {
        match self {
            ExplorationTask::Navigate { url } => format!("Navigate to {}", url),
            ExplorationTask::Click { url, element } => {
                format!("Click \"{}\" on {}", element.label(), url)
            }
        }
    }
}
