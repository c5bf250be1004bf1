//! Common types shared by the explorer and its collaborators.

mod element;
mod step;
mod task;

pub use element::*;
pub use step::*;
pub use task::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
