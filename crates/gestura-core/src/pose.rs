//! Hand poses - validated 21-point hands and the raw payloads they come from
//!
//! Pose estimators hand us loosely typed results. Everything crosses into the
//! pipeline as a `RawHand` and is validated into a `HandPose` exactly once;
//! nothing downstream ever sees a hand with the wrong number of points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Finger, GesturaError, GesturaResult, HandJoint, Landmark};

/// Which hand a pose belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn opposite(self) -> Handedness {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    /// Horizontal direction the thumb points away from the palm, palm facing
    /// an unmirrored camera: +1.0 toward larger x, -1.0 toward smaller x.
    #[inline]
    pub fn thumb_outward_sign(self) -> f32 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Handedness {
    type Err = GesturaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Handedness::Left),
            "right" | "r" => Ok(Handedness::Right),
            _ => Err(GesturaError::UnknownHandedness(s.to_string())),
        }
    }
}

/// A validated hand pose: exactly 21 finite landmarks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; HandJoint::COUNT],
}

impl HandPose {
    pub fn new(landmarks: [Landmark; HandJoint::COUNT]) -> Self {
        Self { landmarks }
    }

    /// Validate an arbitrary landmark slice
    pub fn from_landmarks(landmarks: &[Landmark]) -> GesturaResult<Self> {
        let points: [Landmark; HandJoint::COUNT] =
            landmarks
                .try_into()
                .map_err(|_| GesturaError::InvalidLandmarkCount {
                    expected: HandJoint::COUNT,
                    actual: landmarks.len(),
                })?;

        if let Some(idx) = points.iter().position(|lm| !lm.is_finite()) {
            return Err(GesturaError::NonFiniteLandmark(idx));
        }

        Ok(Self { landmarks: points })
    }

    #[inline]
    pub fn joint(&self, joint: HandJoint) -> Landmark {
        self.landmarks[joint.index()]
    }

    pub fn landmarks(&self) -> &[Landmark; HandJoint::COUNT] {
        &self.landmarks
    }

    pub fn wrist(&self) -> Landmark {
        self.joint(HandJoint::Wrist)
    }

    pub fn tip(&self, finger: Finger) -> Landmark {
        self.joint(finger.tip())
    }

    pub fn pip(&self, finger: Finger) -> Landmark {
        self.joint(finger.pip())
    }

    pub fn mcp(&self, finger: Finger) -> Landmark {
        self.joint(finger.mcp())
    }

    /// Mirror the whole pose across the frame's vertical center line
    pub fn flip_horizontal(&self) -> HandPose {
        let mut landmarks = self.landmarks;
        for lm in &mut landmarks {
            *lm = lm.flip_horizontal();
        }
        HandPose { landmarks }
    }
}

impl TryFrom<&[Landmark]> for HandPose {
    type Error = GesturaError;

    fn try_from(landmarks: &[Landmark]) -> Result<Self, Self::Error> {
        HandPose::from_landmarks(landmarks)
    }
}

fn default_score() -> f32 {
    1.0
}

/// One hand as reported by a pose-estimation service, not yet validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHand {
    pub landmarks: Vec<Landmark>,

    /// Handedness reported by the estimator, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,

    /// Detection score (0.0 - 1.0)
    #[serde(default = "default_score")]
    pub score: f32,
}

impl RawHand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            handedness: None,
            score: 1.0,
        }
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = Some(handedness);
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn validate(&self) -> GesturaResult<HandPose> {
        HandPose::from_landmarks(&self.landmarks)
    }
}

impl From<HandPose> for RawHand {
    fn from(pose: HandPose) -> Self {
        RawHand::new(pose.landmarks.to_vec())
    }
}

/// All hands reported for one video frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandFrame {
    pub hands: Vec<RawHand>,
}

impl HandFrame {
    /// No hand in view
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(hand: impl Into<RawHand>) -> Self {
        Self {
            hands: vec![hand.into()],
        }
    }

    pub fn with_hand(mut self, hand: impl Into<RawHand>) -> Self {
        self.hands.push(hand.into());
        self
    }

    pub fn hands_detected(&self) -> bool {
        !self.hands.is_empty()
    }
}

impl From<HandPose> for HandFrame {
    fn from(pose: HandPose) -> Self {
        HandFrame::single(pose)
    }
}

impl From<RawHand> for HandFrame {
    fn from(hand: RawHand) -> Self {
        HandFrame::single(hand)
    }
}

/// Where the thumb sits in a synthesized pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbPlacement {
    /// Folded across the palm
    Tucked,
    /// Pointing up, above its IP joint and the wrist
    Up,
    /// Pointing down, below its IP joint and the wrist
    Down,
    /// Spread sideways away from the palm, level with its IP joint
    Out,
}

/// Synthesizes canonical upright hand poses.
///
/// Geometry is laid out for a hand with its palm toward an unmirrored camera,
/// so the thumb side faces `handedness.thumb_outward_sign()`. Every finger
/// starts curled with the thumb tucked (a fist).
#[derive(Debug, Clone)]
pub struct HandPoseBuilder {
    handedness: Handedness,
    extended: [bool; 4],
    thumb: ThumbPlacement,
    flipped: bool,
    overrides: Vec<(HandJoint, Landmark)>,
}

const WRIST: (f32, f32) = (0.50, 0.80);
const MCP_Y: f32 = 0.60;
/// Offsets from the wrist along the thumb-outward axis, index to pinky
const MCP_DX: [f32; 4] = [0.06, 0.0, -0.06, -0.12];

impl HandPoseBuilder {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            extended: [false; 4],
            thumb: ThumbPlacement::Tucked,
            flipped: false,
            overrides: Vec::new(),
        }
    }

    pub fn right() -> Self {
        Self::new(Handedness::Right)
    }

    pub fn left() -> Self {
        Self::new(Handedness::Left)
    }

    /// Straighten a non-thumb finger (use `thumb` for the thumb)
    pub fn extend(mut self, finger: Finger) -> Self {
        self.set_finger(finger, true);
        self
    }

    pub fn curl(mut self, finger: Finger) -> Self {
        self.set_finger(finger, false);
        self
    }

    pub fn extend_all(mut self) -> Self {
        self.extended = [true; 4];
        self
    }

    pub fn thumb(mut self, placement: ThumbPlacement) -> Self {
        self.thumb = placement;
        self
    }

    /// Mirror the finished pose, as a selfie-style camera would
    pub fn flipped(mut self) -> Self {
        self.flipped = !self.flipped;
        self
    }

    /// Replace one landmark after the canonical layout is generated
    pub fn with_landmark(mut self, joint: HandJoint, landmark: Landmark) -> Self {
        self.overrides.push((joint, landmark));
        self
    }

    fn set_finger(&mut self, finger: Finger, extended: bool) {
        if let Some(slot) = Finger::non_thumb().iter().position(|f| *f == finger) {
            self.extended[slot] = extended;
        }
    }

    pub fn build(&self) -> HandPose {
        let sign = self.handedness.thumb_outward_sign();
        let at = |dx: f32, y: f32| Landmark::new(WRIST.0 + sign * dx, y, 0.0);

        let mut landmarks = [Landmark::default(); HandJoint::COUNT];
        landmarks[HandJoint::Wrist.index()] = at(0.0, WRIST.1);

        // Thumb: CMC and MCP are fixed, IP and TIP depend on placement
        let (ip, tip) = match self.thumb {
            ThumbPlacement::Tucked => ((0.10, 0.64), (0.07, 0.66)),
            ThumbPlacement::Up => ((0.10, 0.55), (0.10, 0.45)),
            ThumbPlacement::Down => ((0.10, 0.85), (0.10, 0.95)),
            ThumbPlacement::Out => ((0.18, 0.62), (0.26, 0.62)),
        };
        landmarks[HandJoint::ThumbCmc.index()] = at(0.06, 0.76);
        landmarks[HandJoint::ThumbMcp.index()] = at(0.10, 0.70);
        landmarks[HandJoint::ThumbIp.index()] = at(ip.0, ip.1);
        landmarks[HandJoint::ThumbTip.index()] = at(tip.0, tip.1);

        for (slot, finger) in Finger::non_thumb().iter().enumerate() {
            let dx = MCP_DX[slot];
            // Extended: PIP, DIP, TIP stacked above the knuckle.
            // Curled: PIP just above the knuckle, DIP and TIP folded back down.
            let ys = if self.extended[slot] {
                [MCP_Y, 0.50, 0.45, 0.40]
            } else {
                [MCP_Y, 0.52, 0.56, 0.60]
            };
            for (joint, y) in finger.joints().iter().zip(ys) {
                landmarks[joint.index()] = at(dx, y);
            }
        }

        for (joint, landmark) in &self.overrides {
            landmarks[joint.index()] = *landmark;
        }

        let pose = HandPose::new(landmarks);
        if self.flipped {
            pose.flip_horizontal()
        } else {
            pose
        }
    }

    /// Build and wrap as a raw estimator payload tagged with this handedness
    pub fn build_raw(&self) -> RawHand {
        RawHand::from(self.build()).with_handedness(self.handedness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_landmarks_rejects_wrong_count() {
        let short = vec![Landmark::default(); 10];
        match HandPose::from_landmarks(&short) {
            Err(GesturaError::InvalidLandmarkCount { expected, actual }) => {
                assert_eq!(expected, 21);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let long = vec![Landmark::default(); 22];
        assert!(HandPose::from_landmarks(&long).is_err());
    }

    #[test]
    fn test_from_landmarks_rejects_nan() {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 21];
        points[7].y = f32::NAN;
        assert!(matches!(
            HandPose::from_landmarks(&points),
            Err(GesturaError::NonFiniteLandmark(7))
        ));
    }

    #[test]
    fn test_builder_fist_layout() {
        let pose = HandPoseBuilder::right().build();
        for finger in Finger::non_thumb() {
            assert!(pose.tip(*finger).is_below(&pose.pip(*finger)));
        }
    }

    #[test]
    fn test_builder_extended_layout() {
        let pose = HandPoseBuilder::right().extend(Finger::Index).build();
        assert!(pose.tip(Finger::Index).is_above(&pose.pip(Finger::Index)));
        assert!(pose.tip(Finger::Middle).is_below(&pose.pip(Finger::Middle)));
    }

    #[test]
    fn test_left_hand_mirrors_right() {
        let right = HandPoseBuilder::right().extend_all().build();
        let left = HandPoseBuilder::left().extend_all().build();
        let flipped = right.flip_horizontal();
        for (a, b) in left.landmarks().iter().zip(flipped.landmarks()) {
            assert!((a.x - b.x).abs() < 1e-6);
            assert!((a.y - b.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_raw_hand_deserialize() {
        let points: Vec<[f32; 3]> = vec![[0.5, 0.5, 0.0]; 21];
        let json = serde_json::json!({ "landmarks": points, "handedness": "left" });
        let raw: RawHand = serde_json::from_value(json).unwrap();

        assert_eq!(raw.handedness, Some(Handedness::Left));
        assert_eq!(raw.score, 1.0);
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_handedness_parse() {
        assert_eq!("Left".parse::<Handedness>().unwrap(), Handedness::Left);
        assert_eq!(" RIGHT ".parse::<Handedness>().unwrap(), Handedness::Right);
        assert!("both".parse::<Handedness>().is_err());
    }

    #[test]
    fn test_frame_presence() {
        assert!(!HandFrame::empty().hands_detected());
        let frame = HandFrame::from(HandPoseBuilder::right().build());
        assert!(frame.hands_detected());
    }
}
