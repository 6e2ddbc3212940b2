//! Canonical poses per sign and a synchronous translator harness

use gestura_core::{
    Finger, GestureLabel, HandFrame, HandPose, HandPoseBuilder, Handedness, Landmark, RawHand,
    ThumbPlacement,
};
use gestura_runtime::{TickOutcome, Translator, TranslatorConfig};

use crate::recorder::{RecordingDisplay, RecordingSpeaker};

/// Builder preset that produces `label` for a hand of `handedness`
pub fn builder_for(label: GestureLabel, handedness: Handedness) -> HandPoseBuilder {
    let hand = HandPoseBuilder::new(handedness);
    match label {
        GestureLabel::Hello => hand.extend_all().thumb(ThumbPlacement::Out),
        GestureLabel::Yes => hand.thumb(ThumbPlacement::Up),
        GestureLabel::No => hand.thumb(ThumbPlacement::Down),
        GestureLabel::ILoveYou => hand
            .extend(Finger::Index)
            .extend(Finger::Pinky)
            .thumb(ThumbPlacement::Out),
        GestureLabel::Peace => hand.extend(Finger::Index).extend(Finger::Middle),
    }
}

pub fn pose_for(label: GestureLabel, handedness: Handedness) -> HandPose {
    builder_for(label, handedness).build()
}

/// Single right-hand frame showing `label`
pub fn frame_for(label: GestureLabel) -> HandFrame {
    HandFrame::single(builder_for(label, Handedness::Right).build_raw())
}

/// A closed fist with the thumb tucked, which matches no sign
pub fn fist(handedness: Handedness) -> HandPose {
    HandPoseBuilder::new(handedness).build()
}

/// A hand whose landmark list has the wrong length
pub fn malformed_frame(landmark_count: usize) -> HandFrame {
    HandFrame::single(RawHand::new(vec![Landmark::new(0.5, 0.5, 0.0); landmark_count]))
}

/// Drives a started translator tick by tick with recording sinks
pub struct Harness {
    translator: Translator<RecordingSpeaker, RecordingDisplay>,
    speaker: RecordingSpeaker,
    display: RecordingDisplay,
}

impl Harness {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self::with_speaker(config, RecordingSpeaker::new())
    }

    pub fn with_speaker(config: &TranslatorConfig, speaker: RecordingSpeaker) -> Self {
        let display = RecordingDisplay::new();
        let mut translator = Translator::new(config, speaker.clone(), display.clone());
        translator.start();
        Harness {
            translator,
            speaker,
            display,
        }
    }

    pub fn right_handed() -> Self {
        Self::new(&TranslatorConfig::new(Handedness::Right))
    }

    pub fn tick(&mut self, frame: Option<HandFrame>) -> TickOutcome {
        self.translator.tick(frame)
    }

    /// Feed one frame per entry; `None` is a tick with no pose
    pub fn play(&mut self, script: &[Option<GestureLabel>]) -> Vec<TickOutcome> {
        script
            .iter()
            .map(|step| self.tick(step.map(frame_for)))
            .collect()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.speaker.utterances()
    }

    pub fn history(&self) -> Vec<GestureLabel> {
        self.translator.session().history().to_vec()
    }

    pub fn current(&self) -> Option<GestureLabel> {
        self.translator.session().current_label()
    }

    pub fn hands_detected(&self) -> bool {
        self.translator.session().hands_detected()
    }

    pub fn translator(&mut self) -> &mut Translator<RecordingSpeaker, RecordingDisplay> {
        &mut self.translator
    }

    pub fn display(&self) -> &RecordingDisplay {
        &self.display
    }
}
