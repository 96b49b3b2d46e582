//! Scripted simulation scenarios
//!
//! A scenario is a TOML file with a route and an ordered list of steps:
//!
//! ```toml
//! attach_sink = true
//!
//! [route]
//! destination_name = "Home"
//! maneuvers = [
//!     { at = 2000.0, turn = { type = "left" }, street = "Elm Street" },
//!     { at = 3000.0, turn = { type = "straight" } },
//! ]
//!
//! [[steps]]
//! kind = "tick"
//! position = 600.0
//! speed = 20.0
//! after = 5
//! ```

use std::path::Path;

use serde::Deserialize;

use guidance_core::{GuidanceSettings, PlannedRoute, PointKind};

fn default_true() -> bool {
    true
}

fn default_after() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Overrides the settings file when present
    #[serde(default)]
    pub settings: Option<GuidanceSettings>,

    /// Attach the speech sink before the first step
    #[serde(default = "default_true")]
    pub attach_sink: bool,

    pub route: PlannedRoute,

    #[serde(default)]
    pub steps: Vec<TimedStep>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read scenario {}: {e}", path.display()))?;
        Self::parse(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let scenario: Scenario = toml::from_str(content).map_err(|e| e.to_string())?;
        scenario.route.validate().map_err(|e| e.to_string())?;
        Ok(scenario)
    }
}

/// A step and the simulated seconds elapsed before it runs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimedStep {
    #[serde(default = "default_after")]
    pub after: u32,

    #[serde(flatten)]
    pub step: Step,
}

impl TimedStep {
    pub fn new(after: u32, step: Step) -> Self {
        Self { after, step }
    }
}

/// Where the vehicle is for a tick or repeat
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Movement {
    /// Absolute position along the route (m)
    #[serde(default)]
    pub position: Option<f64>,

    /// Distance driven since the previous step (m)
    #[serde(default)]
    pub advance: Option<f64>,

    /// Current speed (m/s)
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Step {
    Tick {
        #[serde(flatten)]
        movement: Movement,
    },
    Repeat {
        #[serde(flatten)]
        movement: Movement,
    },
    /// Road alarm by name, e.g. "toll_booth"
    Alarm {
        alarm: String,
    },
    SpeedAlarm {
        max_speed: u32,
        speed: f32,
    },
    OffRoute {
        distance: f64,
    },
    BackOnRoute,
    /// Route recalculated; `new_route` for a freshly requested route
    Reroute {
        #[serde(default)]
        new_route: bool,
    },
    GpsLost,
    GpsRecovered,
    AttachSink,
    DetachSink,
    Arrive {
        #[serde(default)]
        intermediate: bool,
        #[serde(default)]
        name: Option<String>,
    },
    ApproachPoint {
        point: PointKind,
        names: Vec<String>,
        distance: f64,
    },
    PassPoint {
        point: PointKind,
        names: Vec<String>,
    },
    UTurnAtWaypoint,
    Interrupt,
    Mute {
        #[serde(default = "default_true")]
        on: bool,
    },
    /// Only lets time pass
    Wait,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
attach_sink = false

[settings]
keep_informing_minutes = 2

[route]
destination_name = "Home"
maneuvers = [
    { at = 2000.0, turn = { type = "left" }, street = "Elm Street" },
    { at = 3000.0, turn = { type = "straight" } },
]

[[steps]]
kind = "tick"
position = 600.0
speed = 20.0
after = 5

[[steps]]
kind = "alarm"
alarm = "toll_booth"

[[steps]]
kind = "approach-point"
point = "waypoint"
names = ["Bakery"]
distance = 250.0
"#;

    #[test]
    fn parses_sample() {
        let scenario = Scenario::parse(SAMPLE).unwrap();
        assert!(!scenario.attach_sink);
        assert_eq!(scenario.settings.unwrap().keep_informing_minutes, 2);
        assert_eq!(scenario.route.maneuvers.len(), 2);
        assert_eq!(scenario.route.destination_name, "Home");

        assert_eq!(
            scenario.steps[0],
            TimedStep::new(
                5,
                Step::Tick {
                    movement: Movement {
                        position: Some(600.0),
                        advance: None,
                        speed: Some(20.0),
                    }
                }
            )
        );
        assert_eq!(
            scenario.steps[1],
            TimedStep::new(
                1,
                Step::Alarm {
                    alarm: "toll_booth".to_string()
                }
            )
        );
        assert!(matches!(
            scenario.steps[2].step,
            Step::ApproachPoint {
                point: PointKind::Waypoint,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unordered_route() {
        let err = Scenario::parse(
            r#"
[route]
maneuvers = [
    { at = 2000.0, turn = { type = "left" } },
    { at = 1000.0, turn = { type = "straight" } },
]
"#,
        )
        .unwrap_err();
        assert!(err.contains("does not follow"), "{err}");
    }
}
