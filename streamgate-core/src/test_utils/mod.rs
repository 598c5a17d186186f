//! Test utilities shared by unit and integration tests
//!
//! Fixtures build populated [`InMemoryStreamDirectory`](crate::core_stream::InMemoryStreamDirectory)
//! instances; assertions give decision-specific failure messages.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
