use super::Utterance;

/// What the attached speech backend can do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkCapabilities {
    /// Backend phrases ref / street / destination itself
    pub structured_names: bool,
    /// Voice language code, e.g. "en" or "de"
    pub language: String,
}

impl Default for SinkCapabilities {
    fn default() -> Self {
        Self {
            structured_names: false,
            language: "en".to_string(),
        }
    }
}

/// Speech backend boundary.
///
/// `play` is fire-and-forget: the engine never waits for playback and never
/// inspects what the backend does with the utterance.
pub trait CommandSink: Send {
    fn capabilities(&self) -> &SinkCapabilities;

    /// Queue an utterance and speak it as soon as possible
    fn play(&mut self, utterance: Utterance);

    /// Whether the Bluetooth voice-call audio link is already open.
    /// Until it is, near prompts are triggered earlier to cover the warm-up.
    fn sco_connected(&self) -> bool {
        false
    }

    /// Stop what is currently being spoken
    fn stop(&mut self) {}

    /// Drop everything queued (application shutdown)
    fn clear(&mut self) {}
}
