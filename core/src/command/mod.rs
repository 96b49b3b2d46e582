//! Command sink boundary
//!
//! This module provides:
//! - **Utterances**: ordered phrase fragments with numeric parameters
//! - **Sink**: the speech backend trait and its capability flags
//! - **Channel sink**: a sink that forwards to a speech service task
//! - **Pending command**: the route notice queued while no sink is attached
//! - **Cue**: the short sound that precedes some announcements
//! - **Listeners**: observers notified on the main context

mod channel;
mod cue;
mod listeners;
mod pending;
mod sink;
mod utterance;

pub use channel::{ChannelSink, SpeechEvent, SpeechSender, create_speech_channel};
pub use cue::CuePlayer;
pub use listeners::{
    ChannelScheduler, InlineScheduler, ListenerId, MainTask, Scheduler, VoiceMessageListener,
    VoiceMessageListeners,
};
pub use pending::PendingCommand;
pub use sink::{CommandSink, SinkCapabilities};
pub use utterance::{Phrase, Utterance};
