//! Release orchestration: the decision logic of the crate.
//!
//! Everything here is exercised through
//! [`Orchestrator::create_release`](self::core::Orchestrator::create_release),
//! which composes repository resolution, version computation, changelog
//! rendering, and publication over the forge traits.

pub mod changelog;
pub mod core;
pub mod resolver;
pub mod version;

pub use self::core::{CONFIDENCE_THRESHOLD, Orchestrator, ReleaseResult};
pub use self::version::VersionBump;

#[cfg(test)]
mod tests;
