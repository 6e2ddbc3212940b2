//! Gestura Vision - Hand gesture recognition from pose landmarks
//!
//! This is NOT a trained model. Classification is a transparent, ordered set
//! of geometric rules over which fingers are extended in a single frame.
//!
//! # Pipeline
//!
//! HandPose → FeatureSet (extension flags) → Rule → GestureLabel

pub mod classifier;
pub mod features;

pub use classifier::*;
pub use features::*;
