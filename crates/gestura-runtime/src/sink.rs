//! Output collaborators - speech and display
//!
//! Both are fire-and-forget from the translator's point of view: a call
//! must return without waiting on audio or rendering.

use gestura_core::{GesturaError, GesturaResult, GestureLabel};
use tokio::sync::mpsc;

/// Speaks a label out loud
pub trait Speaker {
    fn speak(&mut self, text: &str) -> GesturaResult<()>;
}

/// Presents the recognized sign and hand presence
pub trait SignDisplay {
    fn label_changed(&mut self, label: GestureLabel, confidence: f32);

    fn hands_presence(&mut self, present: bool);
}

impl<T: Speaker + ?Sized> Speaker for Box<T> {
    fn speak(&mut self, text: &str) -> GesturaResult<()> {
        (**self).speak(text)
    }
}

impl<T: SignDisplay + ?Sized> SignDisplay for Box<T> {
    fn label_changed(&mut self, label: GestureLabel, confidence: f32) {
        (**self).label_changed(label, confidence)
    }

    fn hands_presence(&mut self, present: bool) {
        (**self).hands_presence(present)
    }
}

/// Discards all speech
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteSpeaker;

impl Speaker for MuteSpeaker {
    fn speak(&mut self, _text: &str) -> GesturaResult<()> {
        Ok(())
    }
}

/// Hands utterances to an audio task over an unbounded channel.
///
/// Never blocks; overlapping utterances queue up on the receiving side.
#[derive(Debug, Clone)]
pub struct ChannelSpeaker {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSpeaker {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Speaker for ChannelSpeaker {
    fn speak(&mut self, text: &str) -> GesturaResult<()> {
        self.tx
            .send(text.to_string())
            .map_err(|_| GesturaError::Speech("speech channel closed".into()))
    }
}

/// Reports display updates as log events
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl SignDisplay for LogDisplay {
    fn label_changed(&mut self, label: GestureLabel, confidence: f32) {
        tracing::info!(sign = %label, confidence, "display sign");
    }

    fn hands_presence(&mut self, present: bool) {
        tracing::debug!(present, "hands presence");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_speaker_delivers() {
        let (mut speaker, mut rx) = ChannelSpeaker::new();
        speaker.speak("Hello").unwrap();
        speaker.speak("Peace").unwrap();

        assert_eq!(rx.try_recv().unwrap(), "Hello");
        assert_eq!(rx.try_recv().unwrap(), "Peace");
    }

    #[test]
    fn test_channel_speaker_closed() {
        let (mut speaker, rx) = ChannelSpeaker::new();
        drop(rx);

        let err = speaker.speak("Yes").unwrap_err();
        assert!(matches!(err, GesturaError::Speech(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_boxed_speaker() {
        let mut speaker: Box<dyn Speaker> = Box::new(MuteSpeaker);
        assert!(speaker.speak("No").is_ok());
    }
}
