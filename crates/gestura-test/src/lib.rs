//! Gestura Test Harness - Pose sources, recording sinks and scenarios
//!
//! This crate provides:
//! - Scripted, fixture-backed and seeded random pose sources
//! - A failure-injecting source wrapper
//! - Recording speech and display sinks
//! - Canonical poses per sign and a synchronous translator harness

pub mod recorder;
pub mod scenario;
pub mod source;

pub use recorder::*;
pub use scenario::*;
pub use source::*;
