//! Landmarks and the 21-point hand skeleton
//!
//! Coordinates follow the pose estimator's image convention: x and y are
//! normalized to the camera frame with the origin at the top-left, so a
//! smaller y is higher on screen. z is a relative depth with no fixed unit.

use serde::{Deserialize, Serialize};

/// A single tracked 3D point on a hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LandmarkRepr")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Estimators emit either `{x, y, z}` objects or bare `[x, y, z]` triples.
#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkRepr {
    Triple([f32; 3]),
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
}

impl From<LandmarkRepr> for Landmark {
    fn from(repr: LandmarkRepr) -> Self {
        match repr {
            LandmarkRepr::Triple([x, y, z]) => Landmark { x, y, z },
            LandmarkRepr::Object { x, y, z } => Landmark { x, y, z },
        }
    }
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Is this point strictly above `other` on screen?
    #[inline]
    pub fn is_above(&self, other: &Landmark) -> bool {
        self.y < other.y
    }

    /// Is this point strictly below `other` on screen?
    #[inline]
    pub fn is_below(&self, other: &Landmark) -> bool {
        self.y > other.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Mirror across the vertical center line of the frame
    pub fn flip_horizontal(&self) -> Landmark {
        Landmark {
            x: 1.0 - self.x,
            y: self.y,
            z: self.z,
        }
    }

    /// Distance to another landmark
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Landmark { x, y, z }
    }
}

/// Anatomical landmark positions, in estimator order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandJoint {
    Wrist = 0,

    // Thumb
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,

    // Index
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,

    // Middle
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,

    // Ring
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,

    // Pinky
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandJoint {
    /// Number of landmarks in a hand pose
    pub const COUNT: usize = 21;

    /// All joints in index order
    pub fn all() -> &'static [HandJoint; HandJoint::COUNT] {
        use HandJoint::*;
        &[
            Wrist, ThumbCmc, ThumbMcp, ThumbIp, ThumbTip, IndexMcp, IndexPip, IndexDip, IndexTip,
            MiddleMcp, MiddlePip, MiddleDip, MiddleTip, RingMcp, RingPip, RingDip, RingTip,
            PinkyMcp, PinkyPip, PinkyDip, PinkyTip,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<HandJoint> {
        HandJoint::all().get(index).copied()
    }

    /// The digit this joint belongs to (None for the wrist)
    pub fn finger(self) -> Option<Finger> {
        match self.index() {
            0 => None,
            1..=4 => Some(Finger::Thumb),
            5..=8 => Some(Finger::Index),
            9..=12 => Some(Finger::Middle),
            13..=16 => Some(Finger::Ring),
            _ => Some(Finger::Pinky),
        }
    }
}

/// The five digits of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub fn all() -> &'static [Finger; 5] {
        &[
            Finger::Thumb,
            Finger::Index,
            Finger::Middle,
            Finger::Ring,
            Finger::Pinky,
        ]
    }

    /// The four digits whose extension is judged vertically
    pub fn non_thumb() -> &'static [Finger; 4] {
        &[Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
    }

    /// Joints from base to tip. For the thumb: CMC, MCP, IP, TIP.
    pub fn joints(self) -> [HandJoint; 4] {
        let base = 1 + 4 * (self as usize);
        let all = HandJoint::all();
        [all[base], all[base + 1], all[base + 2], all[base + 3]]
    }

    /// Knuckle joint (MCP). For the thumb this is the thumb MCP.
    pub fn mcp(self) -> HandJoint {
        match self {
            Finger::Thumb => HandJoint::ThumbMcp,
            _ => self.joints()[0],
        }
    }

    /// Proximal interphalangeal joint; for the thumb its single IP joint.
    pub fn pip(self) -> HandJoint {
        match self {
            Finger::Thumb => HandJoint::ThumbIp,
            _ => self.joints()[1],
        }
    }

    pub fn tip(self) -> HandJoint {
        self.joints()[3]
    }
}
