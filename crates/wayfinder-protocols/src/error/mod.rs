//! Error types for the Wayfinder protocol layer.

mod artifact;
mod browser;
mod explore;
mod provider;
mod router;

pub use artifact::*;
pub use browser::*;
pub use explore::*;
pub use provider::*;
pub use router::*;
