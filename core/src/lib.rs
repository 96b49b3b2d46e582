pub mod alarms;
pub mod command;
pub mod error;
pub mod guidance;
pub mod phrase;
pub mod route;
pub mod settings;
pub mod timing;

// Re-exports for convenience
pub use alarms::AlarmKind;
pub use command::{
    ChannelSink, CommandSink, CuePlayer, Phrase, SinkCapabilities, SpeechEvent, Utterance,
    VoiceMessageListeners, create_speech_channel,
};
pub use error::{CueError, RouteError, SettingsError};
pub use guidance::{GuidanceEngine, GuidanceHandle, PointKind, Tier};
pub use guidance_types::{GuidanceSettings, VehicleClass, VehicleProfile};
pub use route::{ManeuverSource, PlannedManeuver, PlannedRoute, TurnKind};
pub use settings::{default_settings_path, load_settings};
pub use timing::{Imminence, TimingProfile};
