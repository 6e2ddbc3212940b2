//! Translator configuration
//!
//! Loaded from JSON. Handedness has no default: the lateral thumb test reads
//! opposite directions for the two hands, so it must always be stated.

use std::path::Path;
use std::time::Duration;

use gestura_core::{GesturaError, GesturaResult, HandFrame, Handedness, RawHand};
use gestura_vision::{ClassifierConfig, HelloThumbPolicy, ThumbModel};
use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_HISTORY_CAPACITY;

/// Which hand to classify when several are reported in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandSelection {
    /// The first hand the estimator reports
    #[default]
    First,
    /// The first hand detected as this handedness, else the first hand
    Prefer(Handedness),
}

impl HandSelection {
    pub fn select<'a>(&self, frame: &'a HandFrame) -> Option<&'a RawHand> {
        match self {
            HandSelection::First => frame.hands.first(),
            HandSelection::Prefer(handedness) => frame
                .hands
                .iter()
                .find(|hand| hand.handedness == Some(*handedness))
                .or_else(|| frame.hands.first()),
        }
    }
}

/// Translator configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Pose sampling interval
    #[serde(with = "duration_text", default = "defaults::sample_interval")]
    pub sample_interval: Duration,
    /// Signs kept in history
    #[serde(default = "defaults::history_capacity")]
    pub history_capacity: usize,
    /// Hand assumed when the estimator does not report one
    pub handedness: Handedness,
    /// Frames come from a mirrored (selfie) camera
    #[serde(default)]
    pub mirrored: bool,
    #[serde(default = "defaults::abduction_threshold")]
    pub abduction_threshold: f32,
    #[serde(default)]
    pub hello_thumb: HelloThumbPolicy,
    #[serde(default)]
    pub hand_selection: HandSelection,
    /// Labels need a score strictly above this; 0.0 disables the floor
    #[serde(default)]
    pub min_confidence: f32,
    /// Consecutive pose source failures tolerated before the driver gives up
    #[serde(default = "defaults::max_source_failures")]
    pub max_source_failures: u32,
}

mod defaults {
    use std::time::Duration;

    pub fn sample_interval() -> Duration {
        Duration::from_millis(100)
    }

    pub fn history_capacity() -> usize {
        crate::session::DEFAULT_HISTORY_CAPACITY
    }

    pub fn abduction_threshold() -> f32 {
        gestura_vision::ThumbModel::DEFAULT_ABDUCTION_THRESHOLD
    }

    pub fn max_source_failures() -> u32 {
        10
    }
}

/// Durations as humantime strings ("100ms", "1s 500ms")
mod duration_text {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(de::Error::custom)
    }
}

impl TranslatorConfig {
    pub fn new(handedness: Handedness) -> Self {
        TranslatorConfig {
            sample_interval: defaults::sample_interval(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            handedness,
            mirrored: false,
            abduction_threshold: ThumbModel::DEFAULT_ABDUCTION_THRESHOLD,
            hello_thumb: HelloThumbPolicy::default(),
            hand_selection: HandSelection::default(),
            min_confidence: 0.0,
            max_source_failures: defaults::max_source_failures(),
        }
    }

    pub fn from_json_str(json: &str) -> GesturaResult<Self> {
        let config: TranslatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> GesturaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> GesturaResult<()> {
        if self.sample_interval.is_zero() {
            return Err(GesturaError::Config("sample_interval must be positive".into()));
        }
        if self.history_capacity == 0 {
            return Err(GesturaError::Config("history_capacity must be at least 1".into()));
        }
        if !self.abduction_threshold.is_finite() || self.abduction_threshold < 0.0 {
            return Err(GesturaError::Config(format!(
                "abduction_threshold must be a non-negative number, got {}",
                self.abduction_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(GesturaError::Config(format!(
                "min_confidence must be within 0.0..=1.0, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            thumb: ThumbModel::new(self.handedness)
                .mirrored(self.mirrored)
                .with_threshold(self.abduction_threshold),
            hello_thumb: self.hello_thumb,
        }
    }
}
