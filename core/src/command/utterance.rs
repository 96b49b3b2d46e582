//! Composed utterances
//!
//! An `Utterance` is an ordered list of phrase fragments with their numeric
//! parameters. The speech backend decides how each fragment is worded.

use std::fmt;

use crate::alarms::AlarmKind;
use crate::phrase::SpeakableName;
use crate::route::TurnDirection;

/// One fragment of an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum Phrase {
    /// "Turn <dir> [in <distance>] [onto <street>]"
    Turn {
        direction: TurnDirection,
        distance: Option<f64>,
        street: SpeakableName,
    },
    /// "After <distance> turn <dir>"
    PrepareTurn {
        direction: TurnDirection,
        distance: f64,
        street: SpeakableName,
    },
    Roundabout {
        distance: Option<f64>,
        angle: f32,
        exit: u8,
        street: SpeakableName,
    },
    PrepareRoundabout {
        distance: f64,
        exit: u8,
        street: SpeakableName,
    },
    MakeUTurn {
        distance: Option<f64>,
        street: SpeakableName,
    },
    PrepareMakeUTurn {
        distance: f64,
        street: SpeakableName,
    },
    /// U-turn when possible, at an intermediate waypoint
    MakeUTurnAtWaypoint,
    /// "Continue [for <distance>] [on <street>]"
    GoAhead {
        distance: Option<f64>,
        street: SpeakableName,
    },
    Then,
    BearLeft {
        street: SpeakableName,
    },
    BearRight {
        street: SpeakableName,
    },
    AndArriveAtDestination {
        name: String,
    },
    AndArriveAtIntermediatePoint {
        name: String,
    },
    AndArriveAtWaypoint {
        name: String,
    },
    AndArriveAtFavorite {
        name: String,
    },
    AndArriveAtPoi {
        name: String,
    },
    ArrivedAtDestination {
        name: String,
    },
    ArrivedAtIntermediatePoint {
        name: String,
    },
    ArrivedAtWaypoint {
        name: String,
    },
    ArrivedAtFavorite {
        name: String,
    },
    ArrivedAtPoi {
        name: String,
    },
    OffRoute {
        distance: f64,
    },
    BackOnRoute,
    Attention {
        alarm: AlarmKind,
    },
    SpeedAlarm {
        max_speed: u32,
        speed: f32,
    },
    RouteCalculated {
        distance: u32,
        time_secs: u32,
    },
    RouteRecalculated {
        distance: u32,
        time_secs: u32,
    },
    GpsLocationLost,
    GpsLocationRecover,
}

/// Ordered phrase fragments handed to the sink in one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Utterance {
    phrases: Vec<Phrase>,
}

impl Utterance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phrase: Phrase) -> &mut Self {
        self.phrases.push(phrase);
        self
    }

    /// Builder form of `push`
    pub fn with(mut self, phrase: Phrase) -> Self {
        self.phrases.push(phrase);
        self
    }

    pub fn then(&mut self) -> &mut Self {
        self.push(Phrase::Then)
    }

    pub fn go_ahead(&mut self, distance: Option<f64>, street: SpeakableName) -> &mut Self {
        self.push(Phrase::GoAhead { distance, street })
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// True if any fragment matches
    pub fn contains(&self, predicate: impl Fn(&Phrase) -> bool) -> bool {
        self.phrases.iter().any(predicate)
    }
}

fn meters(f: &mut fmt::Formatter<'_>, distance: Option<f64>) -> fmt::Result {
    match distance {
        Some(d) => write!(f, "{d:.0}"),
        None => f.write_str("-"),
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phrase::Turn {
                direction,
                distance,
                street,
            } => {
                write!(f, "turn({}, ", direction.as_str())?;
                meters(f, *distance)?;
                write!(f, ", {street})")
            }
            Phrase::PrepareTurn {
                direction,
                distance,
                street,
            } => write!(f, "prepare_turn({}, {distance:.0}, {street})", direction.as_str()),
            Phrase::Roundabout {
                distance,
                angle,
                exit,
                street,
            } => {
                f.write_str("roundabout(")?;
                meters(f, *distance)?;
                write!(f, ", {angle:.0}, {exit}, {street})")
            }
            Phrase::PrepareRoundabout {
                distance,
                exit,
                street,
            } => write!(f, "prepare_roundabout({distance:.0}, {exit}, {street})"),
            Phrase::MakeUTurn { distance, street } => {
                f.write_str("make_ut(")?;
                meters(f, *distance)?;
                write!(f, ", {street})")
            }
            Phrase::PrepareMakeUTurn { distance, street } => {
                write!(f, "prepare_make_ut({distance:.0}, {street})")
            }
            Phrase::MakeUTurnAtWaypoint => f.write_str("make_ut_wp"),
            Phrase::GoAhead { distance, street } => {
                f.write_str("go_ahead(")?;
                meters(f, *distance)?;
                write!(f, ", {street})")
            }
            Phrase::Then => f.write_str("then"),
            Phrase::BearLeft { street } => write!(f, "bear_left({street})"),
            Phrase::BearRight { street } => write!(f, "bear_right({street})"),
            Phrase::AndArriveAtDestination { name } => write!(f, "and_arrive_destination({name})"),
            Phrase::AndArriveAtIntermediatePoint { name } => {
                write!(f, "and_arrive_intermediate({name})")
            }
            Phrase::AndArriveAtWaypoint { name } => write!(f, "and_arrive_waypoint({name})"),
            Phrase::AndArriveAtFavorite { name } => write!(f, "and_arrive_favorite({name})"),
            Phrase::AndArriveAtPoi { name } => write!(f, "and_arrive_poi({name})"),
            Phrase::ArrivedAtDestination { name } => write!(f, "reached_destination({name})"),
            Phrase::ArrivedAtIntermediatePoint { name } => {
                write!(f, "reached_intermediate({name})")
            }
            Phrase::ArrivedAtWaypoint { name } => write!(f, "reached_waypoint({name})"),
            Phrase::ArrivedAtFavorite { name } => write!(f, "reached_favorite({name})"),
            Phrase::ArrivedAtPoi { name } => write!(f, "reached_poi({name})"),
            Phrase::OffRoute { distance } => write!(f, "off_route({distance:.0})"),
            Phrase::BackOnRoute => f.write_str("back_on_route"),
            Phrase::Attention { alarm } => write!(f, "attention({alarm})"),
            Phrase::SpeedAlarm { max_speed, speed } => {
                write!(f, "speed_alarm({max_speed}, {speed:.0})")
            }
            Phrase::RouteCalculated {
                distance,
                time_secs,
            } => write!(f, "route_new_calc({distance}, {time_secs})"),
            Phrase::RouteRecalculated {
                distance,
                time_secs,
            } => write!(f, "route_recalc({distance}, {time_secs})"),
            Phrase::GpsLocationLost => f.write_str("location_lost"),
            Phrase::GpsLocationRecover => f.write_str("location_recovered"),
        }
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phrase) in self.phrases.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{phrase}")?;
        }
        Ok(())
    }
}
