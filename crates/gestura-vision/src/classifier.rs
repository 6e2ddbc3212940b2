//! Gesture classifier - ordered geometric rules over a feature set
//!
//! Rules are evaluated top to bottom and the first match wins:
//!
//! 1. Malformed pose (not 21 points): no gesture
//! 2. Four fingers extended: Hello
//! 3. Fist, thumb up: Yes
//! 4. Fist, thumb down: No
//! 5. Index and pinky only: I Love You
//! 6. Index and middle only: Peace
//! 7. Anything else: no gesture
//!
//! The rules split mostly on how many fingers are extended (0, 2 or 4), but
//! they are not mutually exclusive, so the order matters.

use gestura_core::{GestureLabel, HandPose, Handedness, Landmark, RawHand};
use serde::{Deserialize, Serialize};

use crate::features::{FeatureSet, ThumbModel};

/// How the thumb affects the open-palm rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelloThumbPolicy {
    /// Four extended fingers are enough, wherever the thumb is
    #[default]
    Ignore,
    /// The thumb must also be spread away from the palm
    RequireAbducted,
}

/// Classifier configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    pub thumb: ThumbModel,
    pub hello_thumb: HelloThumbPolicy,
}

impl ClassifierConfig {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            thumb: ThumbModel::new(handedness),
            hello_thumb: HelloThumbPolicy::Ignore,
        }
    }
}

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    OpenPalm,
    ThumbsUp,
    ThumbsDown,
    IndexAndPinky,
    IndexAndMiddle,
    NoMatch,
}

impl Rule {
    pub fn label(self) -> Option<GestureLabel> {
        match self {
            Rule::OpenPalm => Some(GestureLabel::Hello),
            Rule::ThumbsUp => Some(GestureLabel::Yes),
            Rule::ThumbsDown => Some(GestureLabel::No),
            Rule::IndexAndPinky => Some(GestureLabel::ILoveYou),
            Rule::IndexAndMiddle => Some(GestureLabel::Peace),
            Rule::NoMatch => None,
        }
    }
}

/// Full result of classifying one pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub features: FeatureSet,
    pub rule: Rule,
}

impl Classification {
    pub fn label(&self) -> Option<GestureLabel> {
        self.rule.label()
    }
}

/// Stateless rule-based classifier
#[derive(Debug, Clone, Copy)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn for_hand(handedness: Handedness) -> Self {
        Self::new(ClassifierConfig::new(handedness))
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a validated pose
    pub fn classify(&self, pose: &HandPose) -> Option<GestureLabel> {
        self.explain(pose).label()
    }

    /// Classify an unchecked landmark slice. Anything that is not a valid
    /// 21-point pose is "no gesture", never an error.
    pub fn classify_landmarks(&self, landmarks: &[Landmark]) -> Option<GestureLabel> {
        let pose = HandPose::from_landmarks(landmarks).ok()?;
        self.classify(&pose)
    }

    /// Classify an estimator payload, trusting its detected handedness over
    /// the configured one.
    pub fn classify_hand(&self, hand: &RawHand) -> Option<GestureLabel> {
        let pose = hand.validate().ok()?;
        self.evaluate(&pose, &self.thumb_for(hand)).label()
    }

    /// Thumb model for a payload: its detected hand, else the configured one
    pub fn thumb_for(&self, hand: &RawHand) -> ThumbModel {
        match hand.handedness {
            Some(handedness) => self.config.thumb.for_hand(handedness),
            None => self.config.thumb,
        }
    }

    /// Classify and report which rule fired
    pub fn explain(&self, pose: &HandPose) -> Classification {
        self.evaluate(pose, &self.config.thumb)
    }

    pub fn evaluate(&self, pose: &HandPose, thumb: &ThumbModel) -> Classification {
        let features = FeatureSet::extract(pose, thumb);
        Classification {
            features,
            rule: self.match_rule(&features),
        }
    }

    fn match_rule(&self, f: &FeatureSet) -> Rule {
        let extended = f.extended_count();

        let thumb_ok = match self.config.hello_thumb {
            HelloThumbPolicy::Ignore => true,
            HelloThumbPolicy::RequireAbducted => f.thumb_extended_lateral,
        };
        if extended == 4 && thumb_ok {
            return Rule::OpenPalm;
        }

        if extended == 0 && f.thumb_up {
            return Rule::ThumbsUp;
        }

        if extended == 0 && f.thumb_down {
            return Rule::ThumbsDown;
        }

        if f.index_ext && f.pinky_ext && !f.middle_ext && !f.ring_ext {
            return Rule::IndexAndPinky;
        }

        if f.index_ext && f.middle_ext && !f.ring_ext && !f.pinky_ext {
            return Rule::IndexAndMiddle;
        }

        Rule::NoMatch
    }
}

/// One-shot classification of an unchecked landmark slice
pub fn classify(landmarks: &[Landmark], handedness: Handedness) -> Option<GestureLabel> {
    GestureClassifier::for_hand(handedness).classify_landmarks(landmarks)
}
