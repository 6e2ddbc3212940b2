//! Gestura Core - Fundamental types for sign recognition
//!
//! This crate defines the types shared by every stage of the pipeline:
//! - Landmarks and the 21-point hand skeleton (HandJoint, Finger)
//! - Validated hand poses and the raw payloads they are built from
//! - Gesture labels and the sign catalog
//! - Error types

pub mod error;
pub mod gesture;
pub mod landmark;
pub mod pose;

pub use error::*;
pub use gesture::*;
pub use landmark::*;
pub use pose::*;
