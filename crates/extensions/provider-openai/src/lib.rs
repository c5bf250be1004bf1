//! # Wayfinder Provider - OpenAI
//!
//! Chat completions provider for OpenAI and compatible endpoints
//! (Groq, OpenRouter, local servers).

mod api;
mod converter;
mod provider;

pub use provider::OpenAIProvider;
