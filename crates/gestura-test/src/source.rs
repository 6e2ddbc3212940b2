//! Pose sources for tests and demos
//!
//! - Scripted: a fixed queue of frames
//! - Fixture: frames recorded as JSON
//! - Random: a seeded stream of held signs and gaps
//! - Flaky: injects failures in front of another source

use std::collections::VecDeque;
use std::path::Path;

use gestura_core::{
    GesturaError, GesturaResult, GestureLabel, HandFrame, HandPose, Handedness, Landmark, RawHand,
};
use gestura_runtime::PoseSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use crate::scenario::builder_for;

/// Replays a fixed list of frames, then reports exhaustion
#[derive(Debug, Clone, Default)]
pub struct ScriptedPoseSource {
    frames: VecDeque<HandFrame>,
}

impl ScriptedPoseSource {
    pub fn new(frames: impl IntoIterator<Item = HandFrame>) -> Self {
        ScriptedPoseSource {
            frames: frames.into_iter().collect(),
        }
    }

    /// One right-hand frame per entry; `None` becomes an empty frame
    pub fn from_labels(script: &[Option<GestureLabel>]) -> Self {
        Self::new(script.iter().map(|step| match step {
            Some(label) => crate::scenario::frame_for(*label),
            None => HandFrame::empty(),
        }))
    }

    pub fn push(&mut self, frame: HandFrame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PoseSource for ScriptedPoseSource {
    async fn next_frame(&mut self) -> GesturaResult<Option<HandFrame>> {
        Ok(self.frames.pop_front())
    }
}

/// A hand as written in a fixture: a full payload or a bare landmark list
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureHand {
    Payload(RawHand),
    Bare(Vec<Landmark>),
}

impl From<FixtureHand> for RawHand {
    fn from(hand: FixtureHand) -> Self {
        match hand {
            FixtureHand::Payload(raw) => raw,
            FixtureHand::Bare(landmarks) => RawHand::new(landmarks),
        }
    }
}

/// A frame as written in a fixture: several hands or exactly one
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFrame {
    Many(Vec<FixtureHand>),
    One(FixtureHand),
}

fn fixture_frame(entry: Option<FixtureFrame>) -> HandFrame {
    let hands = match entry {
        None => Vec::new(),
        Some(FixtureFrame::One(hand)) => vec![hand.into()],
        Some(FixtureFrame::Many(hands)) => hands.into_iter().map(RawHand::from).collect(),
    };
    HandFrame { hands }
}

/// Frames loaded from a JSON array.
///
/// Each entry is `null` (nothing tracked), a hand, or an array of hands. A
/// hand is either a `RawHand` object or a bare array of landmarks. Landmark
/// count is not checked here; short hands reach the translator as-is.
#[derive(Debug, Clone)]
pub struct FixturePoseSource {
    inner: ScriptedPoseSource,
}

impl FixturePoseSource {
    pub fn from_json_str(json: &str) -> GesturaResult<Self> {
        let entries: Vec<Option<FixtureFrame>> = serde_json::from_str(json)?;
        Ok(FixturePoseSource {
            inner: ScriptedPoseSource::new(entries.into_iter().map(fixture_frame)),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> GesturaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl PoseSource for FixturePoseSource {
    async fn next_frame(&mut self) -> GesturaResult<Option<HandFrame>> {
        self.inner.next_frame().await
    }
}

/// Random pose stream configuration
#[derive(Clone, Debug)]
pub struct RandomPoseConfig {
    pub handedness: Handedness,
    /// Chance that a run is a gap with no hand in view
    pub gap_prob: f64,
    /// Frames each sign (or gap) is held for, inclusive
    pub hold_frames: (u32, u32),
    /// Per-coordinate tracking noise
    pub jitter: f32,
    /// Estimator score range
    pub score: (f32, f32),
    /// Stop after this many frames
    pub limit: Option<usize>,
}

impl Default for RandomPoseConfig {
    fn default() -> Self {
        RandomPoseConfig {
            handedness: Handedness::Right,
            gap_prob: 0.15,
            hold_frames: (3, 12),
            jitter: 0.004,
            score: (0.6, 1.0),
            limit: None,
        }
    }
}

/// Seeded stream of held signs, for demos and soak tests
pub struct RandomPoseSource {
    config: RandomPoseConfig,
    rng: StdRng,
    held: Option<GestureLabel>,
    hold_remaining: u32,
    produced: usize,
}

impl RandomPoseSource {
    pub fn new(config: RandomPoseConfig, seed: u64) -> Self {
        RandomPoseSource {
            config,
            rng: StdRng::seed_from_u64(seed),
            held: None,
            hold_remaining: 0,
            produced: 0,
        }
    }

    /// Sign currently being held, if any
    pub fn held(&self) -> Option<GestureLabel> {
        self.held
    }

    fn next_run(&mut self) {
        let (min, max) = self.config.hold_frames;
        self.hold_remaining = self.rng.gen_range(min.max(1)..=max.max(min).max(1));
        self.held = if self.rng.gen_bool(self.config.gap_prob.clamp(0.0, 1.0)) {
            None
        } else {
            let labels = GestureLabel::all();
            Some(labels[self.rng.gen_range(0..labels.len())])
        };
    }

    fn jittered(&mut self, pose: HandPose) -> HandPose {
        let jitter = self.config.jitter.abs();
        if jitter == 0.0 {
            return pose;
        }
        let mut landmarks = *pose.landmarks();
        for landmark in landmarks.iter_mut() {
            landmark.x += self.rng.gen_range(-jitter..=jitter);
            landmark.y += self.rng.gen_range(-jitter..=jitter);
        }
        HandPose::new(landmarks)
    }

    /// Produce the next frame without the async wrapper
    pub fn next_sync(&mut self) -> Option<HandFrame> {
        if let Some(limit) = self.config.limit {
            if self.produced >= limit {
                return None;
            }
        }
        if self.hold_remaining == 0 {
            self.next_run();
        }
        self.hold_remaining -= 1;
        self.produced += 1;

        let Some(label) = self.held else {
            return Some(HandFrame::empty());
        };
        let handedness = self.config.handedness;
        let pose = self.jittered(builder_for(label, handedness).build());
        let (low, high) = self.config.score;
        let score = if high > low {
            self.rng.gen_range(low..=high)
        } else {
            low
        };
        let hand = RawHand::from(pose)
            .with_handedness(handedness)
            .with_score(score);
        Some(HandFrame::single(hand))
    }
}

impl PoseSource for RandomPoseSource {
    async fn next_frame(&mut self) -> GesturaResult<Option<HandFrame>> {
        Ok(self.next_sync())
    }
}

/// Fails on chosen calls, otherwise delegates
pub struct FlakySource<P> {
    inner: P,
    pattern: VecDeque<bool>,
}

impl<P: PoseSource> FlakySource<P> {
    /// `true` entries fail that call; once the pattern runs out every call
    /// goes to `inner`
    pub fn new(inner: P, pattern: impl IntoIterator<Item = bool>) -> Self {
        FlakySource {
            inner,
            pattern: pattern.into_iter().collect(),
        }
    }
}

impl<P: PoseSource> PoseSource for FlakySource<P> {
    async fn next_frame(&mut self) -> GesturaResult<Option<HandFrame>> {
        if self.pattern.pop_front().unwrap_or(false) {
            debug!(remaining = self.pattern.len(), "injecting pose source failure");
            return Err(GesturaError::Source("camera read failed".into()));
        }
        self.inner.next_frame().await
    }
}
