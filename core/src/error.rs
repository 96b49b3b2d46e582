//! Error types for the guidance engine
//!
//! Per-tick decisions never fail; these cover loading settings, building
//! scripted routes and playing the audio cue.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading guidance settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors in a scripted route
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route has no maneuvers")]
    Empty,

    #[error("maneuver {index} has invalid position {at}")]
    InvalidPosition { index: usize, at: f64 },

    #[error("maneuver {index} at {at} m does not follow previous maneuver at {previous} m")]
    NotIncreasing { index: usize, at: f64, previous: f64 },
}

/// Errors while playing the audio cue that precedes some announcements
#[derive(Debug, Error)]
pub enum CueError {
    #[error("cue sound not found at {path}")]
    Missing { path: PathBuf },

    #[error("failed to start cue playback")]
    Playback(#[source] std::io::Error),
}
