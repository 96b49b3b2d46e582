//! Alarm and advisory throttling
//!
//! Speed-limit and off-route alarms are debounced by wall-clock deltas.
//! Hazard advisories fire once per approach, gated by per-category settings.

mod throttle;

pub use throttle::{OffRouteBackoff, SpeedLimitDebounce};

use std::fmt;

use guidance_types::GuidanceSettings;

/// Road alarm reported by the route collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmKind {
    SpeedLimit { max_speed: u32 },
    SpeedCamera,
    Pedestrian,
    TollBooth,
    BorderControl,
    Railway,
    TrafficCalming,
    Stop,
    Tunnel,
    Hazard,
}

impl AlarmKind {
    /// Whether the settings allow speaking this advisory.
    /// Speed-limit alarms are gated inside the debounce instead.
    pub fn is_enabled(&self, settings: &GuidanceSettings) -> bool {
        match self {
            AlarmKind::SpeedLimit { .. } => settings.speak_speed_limit,
            AlarmKind::SpeedCamera => settings.speak_speed_camera,
            AlarmKind::Pedestrian => settings.speak_pedestrian,
            _ => settings.speak_traffic_warnings,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlarmKind::SpeedLimit { .. } => "SPEED_LIMIT",
            AlarmKind::SpeedCamera => "SPEED_CAMERA",
            AlarmKind::Pedestrian => "PEDESTRIAN",
            AlarmKind::TollBooth => "TOLL_BOOTH",
            AlarmKind::BorderControl => "BORDER_CONTROL",
            AlarmKind::Railway => "RAILWAY",
            AlarmKind::TrafficCalming => "TRAFFIC_CALMING",
            AlarmKind::Stop => "STOP",
            AlarmKind::Tunnel => "TUNNEL",
            AlarmKind::Hazard => "HAZARD",
        }
    }

    /// Parse an alarm name as used in scenarios (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_uppercase().replace('-', "_").as_str() {
            "SPEED_CAMERA" => AlarmKind::SpeedCamera,
            "PEDESTRIAN" => AlarmKind::Pedestrian,
            "TOLL_BOOTH" => AlarmKind::TollBooth,
            "BORDER_CONTROL" => AlarmKind::BorderControl,
            "RAILWAY" => AlarmKind::Railway,
            "TRAFFIC_CALMING" => AlarmKind::TrafficCalming,
            "STOP" => AlarmKind::Stop,
            "TUNNEL" => AlarmKind::Tunnel,
            "HAZARD" => AlarmKind::Hazard,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Process-lifetime alarm bookkeeping
#[derive(Debug, Clone, Default)]
pub struct AlarmThrottle {
    pub speed_limit: SpeedLimitDebounce,
    pub off_route: OffRouteBackoff,
    /// An off-route alarm was spoken; the next return to the route is announced
    pub back_on_route_pending: bool,
}

impl AlarmThrottle {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
