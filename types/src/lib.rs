//! Shared configuration types for the voice guidance engine
//!
//! This crate contains serializable settings shared between the decision
//! engine (guidance-core) and its front ends. Nothing here has behaviour
//! beyond defaults and small lookups.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vehicle
// ─────────────────────────────────────────────────────────────────────────────

/// Class of vehicle being guided. Determines the announcement timing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    #[default]
    Car,
    Truck,
    Motorcycle,
    Bicycle,
    Pedestrian,
    Boat,
    Aircraft,
    /// Anything without a fixed table; thresholds scale with the default speed
    Other,
}

impl VehicleClass {
    /// The base class whose fixed timing table this class reuses, if any.
    ///
    /// Trucks and motorcycles route like cars. Boats, aircraft and custom
    /// profiles have no table and return `None`.
    pub fn base(&self) -> Option<VehicleClass> {
        match self {
            VehicleClass::Car | VehicleClass::Truck | VehicleClass::Motorcycle => {
                Some(VehicleClass::Car)
            }
            VehicleClass::Bicycle => Some(VehicleClass::Bicycle),
            VehicleClass::Pedestrian => Some(VehicleClass::Pedestrian),
            VehicleClass::Boat | VehicleClass::Aircraft | VehicleClass::Other => None,
        }
    }

    /// Parse a lowercase class name as used on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name.trim().to_ascii_lowercase().as_str() {
            "car" | "automobile" => VehicleClass::Car,
            "truck" => VehicleClass::Truck,
            "motorcycle" => VehicleClass::Motorcycle,
            "bicycle" | "bike" => VehicleClass::Bicycle,
            "pedestrian" | "foot" => VehicleClass::Pedestrian,
            "boat" => VehicleClass::Boat,
            "aircraft" => VehicleClass::Aircraft,
            "other" => VehicleClass::Other,
            _ => return None,
        };
        Some(class)
    }
}

/// Vehicle class plus the default speed configured for it (m/s).
///
/// The default speed only matters for classes without a fixed table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    #[serde(default)]
    pub class: VehicleClass,

    /// Default cruising speed in m/s
    #[serde(default = "default_vehicle_speed")]
    pub default_speed: f32,
}

fn default_vehicle_speed() -> f32 {
    12.0
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            class: VehicleClass::Car,
            default_speed: default_vehicle_speed(),
        }
    }
}

impl VehicleProfile {
    pub fn new(class: VehicleClass, default_speed: f32) -> Self {
        Self {
            class,
            default_speed,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guidance Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Settings surface read by the guidance engine.
///
/// The engine never writes these back; front ends own persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceSettings {
    /// Drop every utterance before it reaches the speech backend
    #[serde(default)]
    pub mute: bool,

    /// Include ref / street / destination names in turn prompts
    #[serde(default = "default_true")]
    pub speak_street_names: bool,

    #[serde(default = "default_true")]
    pub speak_speed_limit: bool,

    #[serde(default = "default_true")]
    pub speak_speed_camera: bool,

    #[serde(default = "default_true")]
    pub speak_pedestrian: bool,

    /// Toll booths, railway crossings, stops and other road warnings
    #[serde(default = "default_true")]
    pub speak_traffic_warnings: bool,

    /// Repeat "continue for" every N minutes of silence (0 = off)
    #[serde(default)]
    pub keep_informing_minutes: u32,

    /// Preferred locale for road names (e.g. "de"); None uses the native name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_locale: Option<String>,

    /// Prefer transliterated road names when no localized name exists
    #[serde(default)]
    pub transliterate_names: bool,

    /// Guidance is routed through a Bluetooth voice-call (SCO) audio link
    #[serde(default)]
    pub guidance_over_bt_sco: bool,

    /// Time the SCO link needs before audio is audible (ms)
    #[serde(default = "default_bt_sco_delay_ms")]
    pub bt_sco_delay_ms: u32,

    /// Wake the screen for this many seconds on each voice message (0 = off).
    /// Listeners are only notified when this is non-zero.
    #[serde(default)]
    pub wake_on_voice_secs: u32,

    #[serde(default)]
    pub vehicle: VehicleProfile,
}

fn default_true() -> bool {
    true
}

fn default_bt_sco_delay_ms() -> u32 {
    1500
}

impl Default for GuidanceSettings {
    fn default() -> Self {
        Self {
            mute: false,
            speak_street_names: true,
            speak_speed_limit: true,
            speak_speed_camera: true,
            speak_pedestrian: true,
            speak_traffic_warnings: true,
            keep_informing_minutes: 0,
            preferred_locale: None,
            transliterate_names: false,
            guidance_over_bt_sco: false,
            bt_sco_delay_ms: default_bt_sco_delay_ms(),
            wake_on_voice_secs: 0,
            vehicle: VehicleProfile::default(),
        }
    }
}

impl GuidanceSettings {
    /// Keep-informing interval in seconds, or None when disabled
    pub fn keep_informing_secs(&self) -> Option<i64> {
        (self.keep_informing_minutes > 0).then(|| i64::from(self.keep_informing_minutes) * 60)
    }

    /// Whether listeners should be told about dispatched voice messages
    pub fn notifies_listeners(&self) -> bool {
        self.wake_on_voice_secs > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_classes_use_car_table() {
        assert_eq!(VehicleClass::Truck.base(), Some(VehicleClass::Car));
        assert_eq!(VehicleClass::Motorcycle.base(), Some(VehicleClass::Car));
        assert_eq!(VehicleClass::Boat.base(), None);
    }

    #[test]
    fn class_names_parse() {
        assert_eq!(VehicleClass::from_name("Bike"), Some(VehicleClass::Bicycle));
        assert_eq!(VehicleClass::from_name("hovercraft"), None);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let settings: GuidanceSettings = toml::from_str("").unwrap();
        assert_eq!(settings, GuidanceSettings::default());
        assert!(settings.speak_street_names);
        assert_eq!(settings.keep_informing_secs(), None);
    }

    #[test]
    fn partial_toml_overrides() {
        let settings: GuidanceSettings = toml::from_str(
            r#"
            keep_informing_minutes = 3
            wake_on_voice_secs = 5

            [vehicle]
            class = "boat"
            default_speed = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.keep_informing_secs(), Some(180));
        assert!(settings.notifies_listeners());
        assert_eq!(settings.vehicle.class, VehicleClass::Boat);
        assert_eq!(settings.vehicle.default_speed, 4.0);
    }
}
