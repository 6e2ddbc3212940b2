//! Feature extraction - per-digit extension state from raw landmarks
//!
//! The four fingers are judged vertically: a finger is extended when its tip
//! sits higher on screen than its PIP joint. The thumb moves sideways relative
//! to the palm, so it gets its own vertical (up/down) and lateral tests.

use gestura_core::{Finger, HandJoint, HandPose, Handedness};
use serde::{Deserialize, Serialize};

/// Palm widths below this are treated as this, to keep the lateral ratio finite
const MIN_PALM_WIDTH: f32 = 1e-3;

/// Parameters for the lateral thumb test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbModel {
    /// Hand assumed when the pose carries no detected handedness
    pub handedness: Handedness,

    /// Frames come from a mirrored (selfie) camera
    #[serde(default)]
    pub mirrored: bool,

    /// Minimum outward thumb displacement, in palm widths
    #[serde(default = "ThumbModel::default_abduction_threshold")]
    pub abduction_threshold: f32,
}

impl ThumbModel {
    pub const DEFAULT_ABDUCTION_THRESHOLD: f32 = 0.25;

    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            mirrored: false,
            abduction_threshold: Self::DEFAULT_ABDUCTION_THRESHOLD,
        }
    }

    fn default_abduction_threshold() -> f32 {
        Self::DEFAULT_ABDUCTION_THRESHOLD
    }

    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.abduction_threshold = threshold;
        self
    }

    /// Same model, different hand
    pub fn for_hand(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// +1.0 if the thumb points toward larger x in the frame, -1.0 otherwise
    pub fn outward_sign(&self) -> f32 {
        let sign = self.handedness.thumb_outward_sign();
        if self.mirrored {
            -sign
        } else {
            sign
        }
    }
}

/// Extension state derived from a single hand pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureSet {
    pub thumb_up: bool,
    pub thumb_down: bool,
    pub thumb_extended_lateral: bool,
    pub index_ext: bool,
    pub middle_ext: bool,
    pub ring_ext: bool,
    pub pinky_ext: bool,
}

impl FeatureSet {
    pub fn extract(pose: &HandPose, thumb: &ThumbModel) -> FeatureSet {
        let wrist = pose.wrist();
        let thumb_tip = pose.tip(Finger::Thumb);
        let thumb_ip = pose.pip(Finger::Thumb);

        FeatureSet {
            thumb_up: thumb_tip.is_above(&thumb_ip) && thumb_tip.is_above(&wrist),
            thumb_down: thumb_tip.is_below(&thumb_ip) && thumb_tip.is_below(&wrist),
            thumb_extended_lateral: thumb_abduction(pose, thumb) > thumb.abduction_threshold,
            index_ext: is_extended(pose, Finger::Index),
            middle_ext: is_extended(pose, Finger::Middle),
            ring_ext: is_extended(pose, Finger::Ring),
            pinky_ext: is_extended(pose, Finger::Pinky),
        }
    }

    /// Extension flag per finger; the thumb reports its lateral (abducted) flag
    pub fn finger(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb_extended_lateral,
            Finger::Index => self.index_ext,
            Finger::Middle => self.middle_ext,
            Finger::Ring => self.ring_ext,
            Finger::Pinky => self.pinky_ext,
        }
    }

    /// Number of extended non-thumb fingers (0..=4)
    pub fn extended_count(&self) -> u8 {
        [self.index_ext, self.middle_ext, self.ring_ext, self.pinky_ext]
            .iter()
            .filter(|ext| **ext)
            .count() as u8
    }
}

/// Tip above PIP means extended
pub fn is_extended(pose: &HandPose, finger: Finger) -> bool {
    pose.tip(finger).is_above(&pose.pip(finger))
}

/// Outward horizontal displacement of the thumb tip from the index knuckle,
/// in palm widths. Negative when the thumb crosses toward the pinky side.
pub fn thumb_abduction(pose: &HandPose, thumb: &ThumbModel) -> f32 {
    let thumb_tip = pose.joint(HandJoint::ThumbTip);
    let index_mcp = pose.joint(HandJoint::IndexMcp);
    let pinky_mcp = pose.joint(HandJoint::PinkyMcp);

    let palm_width = (index_mcp.x - pinky_mcp.x).abs().max(MIN_PALM_WIDTH);
    (thumb_tip.x - index_mcp.x) * thumb.outward_sign() / palm_width
}
