//! Recognition session - debounced label state and bounded sign history
//!
//! The session holds at most one label. It only moves when a *different*
//! label arrives; repeats and "no gesture" frames leave it untouched, so a
//! single dropped tracking frame never clears what is on screen.

use std::collections::VecDeque;

use gestura_core::{GestureLabel, Recognition};

/// Default number of signs kept in history
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Most recent signs, oldest first
#[derive(Debug, Clone)]
pub struct SignHistory {
    entries: VecDeque<GestureLabel>,
    capacity: usize,
}

impl SignHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sign, returning the entry evicted to make room (if any)
    pub fn push(&mut self, label: GestureLabel) -> Option<GestureLabel> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(label);
        evicted
    }

    pub fn latest(&self) -> Option<GestureLabel> {
        self.entries.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = GestureLabel> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<GestureLabel> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SignHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// An accepted label change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub previous: Option<GestureLabel>,
    pub recognition: Recognition,
    /// History entry pushed out by this transition
    pub evicted: Option<GestureLabel>,
}

impl Transition {
    pub fn label(&self) -> GestureLabel {
        self.recognition.label
    }
}

/// Process-local recognition state, owned by a single writer
#[derive(Debug, Clone, Default)]
pub struct RecognitionSession {
    current: Option<Recognition>,
    hands_detected: bool,
    history: SignHistory,
}

impl RecognitionSession {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            current: None,
            hands_detected: false,
            history: SignHistory::new(history_capacity),
        }
    }

    /// Feed one classifier output.
    ///
    /// Returns a transition only when the label differs from the one held.
    /// A repeated label refreshes the stored confidence without side effects.
    pub fn observe(&mut self, recognition: Option<Recognition>) -> Option<Transition> {
        let recognition = recognition?;

        if let Some(current) = self.current.as_mut() {
            if current.label == recognition.label {
                current.confidence = recognition.confidence;
                return None;
            }
        }

        let previous = self.current_label();
        self.current = Some(recognition);
        let evicted = self.history.push(recognition.label);

        Some(Transition {
            previous,
            recognition,
            evicted,
        })
    }

    /// Update hand presence. Returns true if it changed.
    pub fn set_hands_detected(&mut self, present: bool) -> bool {
        let changed = self.hands_detected != present;
        self.hands_detected = present;
        changed
    }

    /// Stop translating: drop the held label and presence flag, keep history
    pub fn reset(&mut self) {
        self.current = None;
        self.hands_detected = false;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn current(&self) -> Option<Recognition> {
        self.current
    }

    pub fn current_label(&self) -> Option<GestureLabel> {
        self.current.map(|r| r.label)
    }

    pub fn hands_detected(&self) -> bool {
        self.hands_detected
    }

    pub fn history(&self) -> &SignHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sure(label: GestureLabel) -> Option<Recognition> {
        Some(Recognition::certain(label))
    }

    #[test]
    fn test_first_label_transitions() {
        let mut session = RecognitionSession::default();
        let t = session.observe(sure(GestureLabel::Hello)).unwrap();

        assert_eq!(t.previous, None);
        assert_eq!(t.label(), GestureLabel::Hello);
        assert_eq!(session.current_label(), Some(GestureLabel::Hello));
        assert_eq!(session.history().to_vec(), vec![GestureLabel::Hello]);
    }

    #[test]
    fn test_repeats_are_debounced() {
        let mut session = RecognitionSession::default();
        assert!(session.observe(sure(GestureLabel::Peace)).is_some());
        for _ in 0..10 {
            assert!(session.observe(sure(GestureLabel::Peace)).is_none());
        }
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_no_gesture_keeps_label() {
        let mut session = RecognitionSession::default();
        session.observe(sure(GestureLabel::Yes));

        assert!(session.observe(None).is_none());
        assert_eq!(session.current_label(), Some(GestureLabel::Yes));
    }

    #[test]
    fn test_repeat_refreshes_confidence() {
        let mut session = RecognitionSession::default();
        session.observe(Some(Recognition::new(GestureLabel::No, 0.8)));
        session.observe(Some(Recognition::new(GestureLabel::No, 0.9)));

        let current = session.current().unwrap();
        assert!((current.confidence - 0.9).abs() < 1e-6);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_history_bounded() {
        let mut session = RecognitionSession::new(5);
        let sequence = [
            GestureLabel::Hello,
            GestureLabel::Yes,
            GestureLabel::No,
            GestureLabel::ILoveYou,
            GestureLabel::Peace,
            GestureLabel::Hello,
            GestureLabel::Yes,
        ];

        let mut evicted = Vec::new();
        for label in sequence {
            if let Some(t) = session.observe(sure(label)) {
                evicted.extend(t.evicted);
            }
            assert!(session.history().len() <= 5);
        }

        assert_eq!(session.history().to_vec(), sequence[2..].to_vec());
        assert_eq!(evicted, vec![GestureLabel::Hello, GestureLabel::Yes]);
    }

    #[test]
    fn test_alternating_labels_all_recorded() {
        let mut session = RecognitionSession::default();
        session.observe(sure(GestureLabel::Hello));
        session.observe(sure(GestureLabel::Peace));
        let t = session.observe(sure(GestureLabel::Hello)).unwrap();

        assert_eq!(t.previous, Some(GestureLabel::Peace));
        assert_eq!(
            session.history().to_vec(),
            vec![GestureLabel::Hello, GestureLabel::Peace, GestureLabel::Hello]
        );
    }

    #[test]
    fn test_reset_keeps_history() {
        let mut session = RecognitionSession::default();
        session.set_hands_detected(true);
        session.observe(sure(GestureLabel::Peace));
        session.reset();

        assert_eq!(session.current_label(), None);
        assert!(!session.hands_detected());
        assert_eq!(session.history().to_vec(), vec![GestureLabel::Peace]);

        // The same sign after a reset is a fresh transition
        assert!(session.observe(sure(GestureLabel::Peace)).is_some());
    }

    #[test]
    fn test_presence_change_detection() {
        let mut session = RecognitionSession::default();
        assert!(session.set_hands_detected(true));
        assert!(!session.set_hands_detected(true));
        assert!(session.set_hands_detected(false));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(SignHistory::new(0).capacity(), 1);
    }
}
