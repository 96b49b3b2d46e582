//! Channel-backed command sink
//!
//! Forwards utterances to a speech service task over a bounded tokio
//! channel. Sending never waits; when the service falls behind, the
//! utterance is dropped with a warning.

use tokio::sync::mpsc;

use super::{CommandSink, SinkCapabilities, Utterance};

/// Messages consumed by the speech service
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Speak(Utterance),
    Stop,
    Clear,
}

/// Sender handle for speech events
pub type SpeechSender = mpsc::Sender<SpeechEvent>;

/// Create a new speech channel
pub fn create_speech_channel() -> (SpeechSender, mpsc::Receiver<SpeechEvent>) {
    // Guidance produces a few utterances per minute; 64 is ample
    mpsc::channel(64)
}

/// `CommandSink` that hands utterances to a speech service task
#[derive(Debug)]
pub struct ChannelSink {
    sender: SpeechSender,
    capabilities: SinkCapabilities,
}

impl ChannelSink {
    pub fn new(sender: SpeechSender, capabilities: SinkCapabilities) -> Self {
        Self {
            sender,
            capabilities,
        }
    }

    fn send(&self, event: SpeechEvent) {
        if let Err(e) = self.sender.try_send(event) {
            tracing::warn!(error = %e, "Speech event dropped");
        }
    }
}

impl CommandSink for ChannelSink {
    fn capabilities(&self) -> &SinkCapabilities {
        &self.capabilities
    }

    fn play(&mut self, utterance: Utterance) {
        self.send(SpeechEvent::Speak(utterance));
    }

    fn stop(&mut self) {
        self.send(SpeechEvent::Stop);
    }

    fn clear(&mut self) {
        self.send(SpeechEvent::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Phrase;

    #[test]
    fn forwards_without_waiting() {
        let (tx, mut rx) = create_speech_channel();
        let mut sink = ChannelSink::new(tx, SinkCapabilities::default());

        sink.play(Utterance::new().with(Phrase::BackOnRoute));
        sink.stop();

        assert_eq!(
            rx.try_recv().unwrap(),
            SpeechEvent::Speak(Utterance::new().with(Phrase::BackOnRoute))
        );
        assert_eq!(rx.try_recv().unwrap(), SpeechEvent::Stop);
    }

    #[test]
    fn full_channel_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut sink = ChannelSink::new(tx, SinkCapabilities::default());
        sink.play(Utterance::new().with(Phrase::Then));
        sink.play(Utterance::new().with(Phrase::BackOnRoute));

        assert!(matches!(rx.try_recv(), Ok(SpeechEvent::Speak(_))));
        assert!(rx.try_recv().is_err());
    }
}
