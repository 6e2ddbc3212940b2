//! Recording speech and display sinks
//!
//! Clones share one buffer, so a test keeps a handle while the translator
//! owns another.

use std::sync::Arc;

use gestura_core::{GesturaError, GesturaResult, GestureLabel};
use gestura_runtime::{SignDisplay, Speaker};
use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every attempt but reports each one as failed
    pub fn failing() -> Self {
        RecordingSpeaker {
            spoken: Arc::default(),
            failing: true,
        }
    }

    pub fn utterances(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&mut self, text: &str) -> GesturaResult<()> {
        self.spoken.lock().push(text.to_string());
        if self.failing {
            return Err(GesturaError::Speech("speech engine unavailable".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayEvent {
    Label(GestureLabel, f32),
    Presence(bool),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    events: Arc<Mutex<Vec<DisplayEvent>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().clone()
    }

    pub fn labels(&self) -> Vec<GestureLabel> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Label(label, _) => Some(*label),
                DisplayEvent::Presence(_) => None,
            })
            .collect()
    }

    pub fn presence_changes(&self) -> Vec<bool> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Presence(present) => Some(*present),
                DisplayEvent::Label(..) => None,
            })
            .collect()
    }
}

impl SignDisplay for RecordingDisplay {
    fn label_changed(&mut self, label: GestureLabel, confidence: f32) {
        self.events.lock().push(DisplayEvent::Label(label, confidence));
    }

    fn hands_presence(&mut self, present: bool) {
        self.events.lock().push(DisplayEvent::Presence(present));
    }
}
