//! Gesture labels and the sign catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GesturaError;

/// The closed set of recognizable signs. "No gesture" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    Hello,
    Yes,
    No,
    #[serde(rename = "I Love You")]
    ILoveYou,
    Peace,
}

/// User-facing description of how to make a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignGuide {
    pub title: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
}

impl GestureLabel {
    /// All labels, in classifier rule order
    pub fn all() -> &'static [GestureLabel; 5] {
        &[
            GestureLabel::Hello,
            GestureLabel::Yes,
            GestureLabel::No,
            GestureLabel::ILoveYou,
            GestureLabel::Peace,
        ]
    }

    /// Text shown and spoken for this sign
    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Hello => "Hello",
            GestureLabel::Yes => "Yes",
            GestureLabel::No => "No",
            GestureLabel::ILoveYou => "I Love You",
            GestureLabel::Peace => "Peace",
        }
    }

    /// Compact key used by the recognition backend's action list
    pub fn action_key(self) -> &'static str {
        match self {
            GestureLabel::Hello => "hello",
            GestureLabel::Yes => "yes",
            GestureLabel::No => "no",
            GestureLabel::ILoveYou => "iloveyou",
            GestureLabel::Peace => "peace",
        }
    }

    pub fn guide(self) -> SignGuide {
        match self {
            GestureLabel::Hello => SignGuide {
                title: "Hello / Stop",
                description: "Open palm facing camera",
                instruction: "Extend all fingers.",
            },
            GestureLabel::Yes => SignGuide {
                title: "Yes / Like",
                description: "Thumbs up",
                instruction: "Fist with thumb pointing up.",
            },
            GestureLabel::No => SignGuide {
                title: "No / Dislike",
                description: "Thumbs down",
                instruction: "Fist with thumb pointing down.",
            },
            GestureLabel::ILoveYou => SignGuide {
                title: "I Love You",
                description: "ILY Sign",
                instruction: "Thumb, Index, and Pinky extended.",
            },
            GestureLabel::Peace => SignGuide {
                title: "Peace / Victory",
                description: "V Sign",
                instruction: "Index and Middle fingers up.",
            },
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureLabel {
    type Err = GesturaError;

    /// Accepts display text ("I Love You") or action keys ("iloveyou"),
    /// ignoring case and spacing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        GestureLabel::all()
            .iter()
            .copied()
            .find(|label| label.action_key() == key)
            .ok_or_else(|| GesturaError::UnknownGesture(s.to_string()))
    }
}

/// A recognized sign with its confidence hint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub label: GestureLabel,
    /// 0.0 - 1.0; the detection score of the pose that produced the label
    pub confidence: f32,
}

impl Recognition {
    pub fn new(label: GestureLabel, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }

    /// A label from a rule match on a fully trusted pose
    pub fn certain(label: GestureLabel) -> Self {
        Self::new(label, 1.0)
    }
}
