//! Candidate elements reported by screenshot interpretation.

use serde::{Deserialize, Serialize};

/// Bounding box of an element, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A box with no clickable area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An interactive element a vision model believes is on screen.
///
/// Purely advisory: nothing guarantees the element exists where reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateElement {
    /// What the element does, e.g. "open settings".
    pub purpose: String,

    /// Visible label, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    pub bounds: Bounds,
}

impl CandidateElement {
    pub fn new(purpose: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            purpose: purpose.into(),
            text: None,
            bounds,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Human-readable label: the visible text when present, else the purpose.
    pub fn label(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.purpose)
    }
}
