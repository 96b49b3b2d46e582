//! Maneuver data handed to the engine by the route collaborator

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TurnKind;

/// Identity of a maneuver. Changes whenever the route is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManeuverId {
    pub route: u32,
    pub index: u32,
}

impl ManeuverId {
    pub fn new(route: u32, index: u32) -> Self {
        Self { route, index }
    }
}

/// One routing instruction. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Maneuver {
    pub id: ManeuverId,

    /// Turn descriptor; `None` when the router produced malformed data
    pub turn: Option<TurnKind>,

    pub street_name: Option<String>,
    pub ref_code: Option<String>,
    pub destination_name: Option<String>,
}

impl Maneuver {
    pub fn new(id: ManeuverId, turn: TurnKind) -> Self {
        Self {
            id,
            turn: Some(turn),
            street_name: None,
            ref_code: None,
            destination_name: None,
        }
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street_name = Some(street.into());
        self
    }

    pub fn with_ref(mut self, ref_code: impl Into<String>) -> Self {
        self.ref_code = Some(ref_code.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination_name = Some(destination.into());
        self
    }

    /// Straight-ahead check that treats a missing descriptor as "not straight"
    pub fn is_straight(&self) -> bool {
        self.turn.is_some_and(|t| t.is_straight())
    }
}

/// Kind of route point reached at a maneuver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Destination,
    Intermediate,
}

/// A route point (final destination or intermediate stop)
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: TargetKind,
    pub name: String,
}

/// A maneuver as seen from a reference point, with the distance to it.
///
/// For `ManeuverSource::next_maneuver` the distance is measured from the
/// current position; for `ManeuverSource::maneuver_after` it is measured from
/// the preceding maneuver.
#[derive(Debug, Clone, PartialEq)]
pub struct ManeuverAhead {
    /// `None` marks the end of the route
    pub maneuver: Option<Maneuver>,
    pub distance: i32,
    /// Set when this maneuver is where a route point is reached
    pub target: Option<Target>,
}

impl ManeuverAhead {
    /// Route end sentinel
    pub fn route_end(distance: i32) -> Self {
        Self {
            maneuver: None,
            distance,
            target: None,
        }
    }

    /// True at the destination, at an intermediate point, or past the last maneuver
    pub fn is_target_point(&self) -> bool {
        self.maneuver.is_none() || self.target.is_some()
    }

    pub fn is_intermediate(&self) -> bool {
        self.target
            .as_ref()
            .is_some_and(|t| t.kind == TargetKind::Intermediate)
    }

    pub fn turn(&self) -> Option<TurnKind> {
        self.maneuver.as_ref().and_then(|m| m.turn)
    }

    pub fn point_name(&self) -> &str {
        self.target.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }
}

/// `is_target_point` for an optional lookahead result; a missing
/// lookahead counts as the end of the route.
pub fn is_target_point(info: Option<&ManeuverAhead>) -> bool {
    info.is_none_or(ManeuverAhead::is_target_point)
}

// ─────────────────────────────────────────────────────────────────────────────
// Road segments
// ─────────────────────────────────────────────────────────────────────────────

/// A road name with optional per-locale variants and a transliteration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub native: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub localized: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliterated: Option<String>,
}

impl LocalizedName {
    pub fn new(native: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            ..Default::default()
        }
    }

    /// Pick the name to speak: the preferred locale if known, else the
    /// transliteration when requested, else the native name.
    pub fn resolve(&self, locale: Option<&str>, transliterate: bool) -> &str {
        if let Some(name) = locale.and_then(|l| self.localized.get(l)) {
            return name;
        }
        if transliterate && let Some(name) = &self.transliterated {
            return name;
        }
        &self.native
    }
}

/// The road the vehicle is currently on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<LocalizedName>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lookahead_is_target() {
        assert!(is_target_point(None));
        assert!(ManeuverAhead::route_end(0).is_target_point());
    }

    #[test]
    fn plain_maneuver_is_not_target() {
        let info = ManeuverAhead {
            maneuver: Some(Maneuver::new(ManeuverId::new(1, 0), TurnKind::left())),
            distance: 100,
            target: None,
        };
        assert!(!is_target_point(Some(&info)));
    }

    #[test]
    fn localized_name_resolution() {
        let mut name = LocalizedName::new("Москва");
        name.localized.insert("de".to_string(), "Moskau".to_string());
        name.transliterated = Some("Moskva".to_string());

        assert_eq!(name.resolve(Some("de"), false), "Moskau");
        assert_eq!(name.resolve(Some("fr"), true), "Moskva");
        assert_eq!(name.resolve(None, false), "Москва");
    }
}
