//! # Wayfinder Protocols
//!
//! Core protocol definitions (traits) for Wayfinder.
//! Contains only interface definitions and shared data types.
//!
//! ## Core Traits
//!
//! - [`ModelProvider`] - A generative model service that can answer prompts
//! - [`BrowserDriver`] - Browser automation primitives used by the explorer
//! - [`VisionInterpreter`] - Turns a screenshot into candidate elements
//! - [`ArtifactStore`] - Persists screenshots and returns references

pub mod artifact;
pub mod browser;
pub mod error;
pub mod provider;
pub mod types;
pub mod vision;

pub use artifact::{ArtifactRef, ArtifactStore};
pub use browser::BrowserDriver;
pub use error::{
    ArtifactError, BrowserError, ExploreError, ProviderError, ProviderFailure, RouterError,
    VisionError,
};
pub use provider::{
    CompletionRequest, CompletionResponse, ImageInput, ModelProvider, ProviderCapabilities, Usage,
};
pub use types::*;
pub use vision::{Interpretation, VisionInterpreter};
