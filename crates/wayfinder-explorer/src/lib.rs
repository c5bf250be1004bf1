//! # Wayfinder Explorer
//!
//! Walks a web application breadth-first: navigate, fingerprint the page
//! state, screenshot it, ask a vision model for clickable elements, and
//! queue a click for each one the policy allows. Every distinct state
//! becomes one [`ManualStep`](wayfinder_protocols::ManualStep).

pub mod artifact;
pub mod config;
pub mod engine;
pub mod fingerprint;
pub mod frontier;
pub mod policy;
pub mod recorder;
pub mod summary;
pub mod vision;

pub use artifact::{FileArtifactStore, MemoryArtifactStore};
pub use config::EngineConfig;
pub use engine::Explorer;
pub use fingerprint::{StateFingerprinter, StructuralFingerprinter, normalize_summary};
pub use frontier::{Enqueue, Frontier};
pub use policy::ClickPolicy;
pub use recorder::{ManualStepRecorder, RecordError};
pub use summary::{ExplorationReport, RunSummary, StopReason};
pub use vision::{RouterVision, parse_elements};
