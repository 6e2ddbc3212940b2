//! Translator - the per-tick recognition loop

use std::time::{Duration, Instant};

use gestura_core::{GestureLabel, HandFrame, RawHand, Recognition};
use gestura_vision::GestureClassifier;
use tracing::{debug, info, trace, warn};

use crate::config::{HandSelection, TranslatorConfig};
use crate::prediction::Prediction;
use crate::session::{RecognitionSession, Transition};
use crate::sink::{SignDisplay, Speaker};

#[derive(Clone, Debug, Default)]
pub struct TranslatorStats {
    pub ticks: u64,
    pub frames_without_hands: u64,
    pub malformed_poses: u64,
    pub no_gesture: u64,
    pub low_confidence: u64,
    pub transitions: u64,
    pub speech_failures: u64,
    pub source_failures: u64,
    pub last_tick_duration: Duration,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not translating; the frame was ignored
    Idle,
    NoHands,
    /// The selected hand was not a valid 21-point pose
    Malformed,
    NoGesture,
    /// Recognized, but scored below the confidence floor
    LowConfidence(GestureLabel),
    /// Same label as the one already held
    Unchanged(GestureLabel),
    Changed(Transition),
}

/// Gestura translator - owns the session and its side effects
pub struct Translator<S, D> {
    classifier: GestureClassifier,
    session: RecognitionSession,
    hand_selection: HandSelection,
    min_confidence: f32,
    translating: bool,
    speaker: S,
    display: D,
    stats: TranslatorStats,
}

impl<S: Speaker, D: SignDisplay> Translator<S, D> {
    pub fn new(config: &TranslatorConfig, speaker: S, display: D) -> Self {
        Translator {
            classifier: GestureClassifier::new(config.classifier_config()),
            session: RecognitionSession::new(config.history_capacity),
            hand_selection: config.hand_selection,
            min_confidence: config.min_confidence,
            translating: false,
            speaker,
            display,
            stats: TranslatorStats::default(),
        }
    }

    /// Begin translating. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.translating {
            return false;
        }
        self.translating = true;
        info!("translation started");
        true
    }

    /// Stop translating. Idempotent; history is kept.
    pub fn stop(&mut self) -> bool {
        if !self.translating {
            return false;
        }
        self.translating = false;
        let was_present = self.session.hands_detected();
        self.session.reset();
        if was_present {
            self.display.hands_presence(false);
        }
        info!(history = self.session.history().len(), "translation stopped");
        true
    }

    pub fn is_translating(&self) -> bool {
        self.translating
    }

    /// Run one tick. `None` means the pose source produced nothing this tick.
    pub fn tick(&mut self, frame: Option<HandFrame>) -> TickOutcome {
        if !self.translating {
            return TickOutcome::Idle;
        }

        let start = Instant::now();
        self.stats.ticks += 1;

        let frame = frame.unwrap_or_default();
        let present = frame.hands_detected();
        if self.session.set_hands_detected(present) {
            self.display.hands_presence(present);
        }

        let outcome = match self.hand_selection.select(&frame) {
            Some(hand) => self.recognize(hand),
            None => {
                self.stats.frames_without_hands += 1;
                TickOutcome::NoHands
            }
        };

        self.stats.last_tick_duration = start.elapsed();
        outcome
    }

    fn recognize(&mut self, hand: &RawHand) -> TickOutcome {
        let pose = match hand.validate() {
            Ok(pose) => pose,
            Err(e) => {
                self.stats.malformed_poses += 1;
                debug!(error = %e, "discarding malformed pose");
                return TickOutcome::Malformed;
            }
        };

        let result = self
            .classifier
            .evaluate(&pose, &self.classifier.thumb_for(hand));
        let Some(label) = result.label() else {
            self.stats.no_gesture += 1;
            trace!(fingers = result.features.extended_count(), "no gesture");
            return TickOutcome::NoGesture;
        };

        let recognition = Recognition::new(label, hand.score);
        if self.min_confidence > 0.0 && recognition.confidence <= self.min_confidence {
            self.stats.low_confidence += 1;
            debug!(sign = %label, confidence = recognition.confidence, "below confidence floor");
            return TickOutcome::LowConfidence(label);
        }

        match self.session.observe(Some(recognition)) {
            Some(transition) => {
                self.announce(&transition);
                TickOutcome::Changed(transition)
            }
            None => TickOutcome::Unchanged(label),
        }
    }

    fn announce(&mut self, transition: &Transition) {
        self.stats.transitions += 1;
        let recognition = transition.recognition;
        info!(
            sign = %recognition.label,
            confidence = recognition.confidence,
            previous = ?transition.previous,
            "sign recognized"
        );

        self.display
            .label_changed(recognition.label, recognition.confidence);

        if let Err(e) = self.speaker.speak(recognition.label.as_str()) {
            self.stats.speech_failures += 1;
            warn!(error = %e, "speech output failed");
        }
    }

    /// Count a pose source failure reported by the driver
    pub fn record_source_failure(&mut self) {
        self.stats.source_failures += 1;
    }

    /// Current state in the remote prediction message shape
    pub fn snapshot(&self) -> Prediction {
        let current = self.session.current();
        Prediction::new(
            current.map(|r| r.label),
            current.map(|r| r.confidence).unwrap_or(0.0),
            self.session.hands_detected(),
        )
    }

    pub fn session(&self) -> &RecognitionSession {
        &self.session
    }

    /// Forget all recorded signs
    pub fn clear_history(&mut self) {
        self.session.clear_history();
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn stats(&self) -> &TranslatorStats {
        &self.stats
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
