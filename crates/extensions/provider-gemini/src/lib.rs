//! # Wayfinder Provider - Gemini
//!
//! Google Gemini `generateContent` provider with inline image support.

mod client;
mod provider;
mod types;

pub use provider::GeminiProvider;
pub use types::*;
