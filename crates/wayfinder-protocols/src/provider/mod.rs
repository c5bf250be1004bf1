//! Model provider protocol definitions.
//!
//! Providers connect to generative model APIs (Gemini, OpenAI-compatible
//! endpoints, etc.) and answer a single prompt, optionally with an image.

mod request;
mod response;
mod traits;

pub use request::*;
pub use response::*;
pub use traits::*;
