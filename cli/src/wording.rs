//! English wording for utterances
//!
//! The engine only emits phrase fragments; this is the text handed to the
//! terminal and to the external TTS program.

use guidance_core::Phrase;
use guidance_core::Utterance;
use guidance_core::phrase::{NameTriple, SpeakableName};
use guidance_core::route::TurnDirection;

pub fn render(utterance: &Utterance) -> String {
    let parts: Vec<String> = utterance
        .phrases()
        .iter()
        .map(render_phrase)
        .filter(|s| !s.is_empty())
        .collect();
    let text = parts.join(" ");
    capitalize(&text)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} kilometers", meters / 1000.0)
    } else if meters >= 100.0 {
        format!("{} meters", ((meters / 10.0).round() * 10.0) as i64)
    } else {
        format!("{} meters", meters.round() as i64)
    }
}

fn duration(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    match (hours, minutes) {
        (0, m) => format!("{m} minutes"),
        (h, 0) => format!("{h} hours"),
        (h, m) => format!("{h} hours {m} minutes"),
    }
}

fn direction(direction: TurnDirection) -> &'static str {
    match direction {
        TurnDirection::Left => "turn left",
        TurnDirection::LeftSharp => "turn sharply left",
        TurnDirection::LeftSlight => "turn slightly left",
        TurnDirection::Right => "turn right",
        TurnDirection::RightSharp => "turn sharply right",
        TurnDirection::RightSlight => "turn slightly right",
        TurnDirection::LeftKeep => "keep left",
        TurnDirection::RightKeep => "keep right",
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn triple(names: &NameTriple) -> String {
    let mut road = match (&names.ref_code, &names.street) {
        (Some(r), Some(s)) => format!("{r}, {s}"),
        (Some(r), None) => r.clone(),
        (None, Some(s)) => s.clone(),
        (None, None) => String::new(),
    };
    if let Some(destination) = &names.destination {
        if road.is_empty() {
            road = format!("towards {destination}");
        } else {
            road = format!("{road} towards {destination}");
        }
    }
    road
}

/// " onto <road>" or nothing
fn onto(street: &SpeakableName) -> String {
    let road = match street {
        SpeakableName::Empty => String::new(),
        SpeakableName::Plain(name) => name.clone(),
        SpeakableName::Structured(s) => triple(&s.next),
    };
    if road.is_empty() {
        road
    } else {
        format!(" onto {road}")
    }
}

/// " on <road>" or nothing
fn on(street: &SpeakableName) -> String {
    let road = match street {
        SpeakableName::Empty => String::new(),
        SpeakableName::Plain(name) => name.clone(),
        SpeakableName::Structured(s) => s
            .current
            .as_ref()
            .map(triple)
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| triple(&s.next)),
    };
    if road.is_empty() {
        road
    } else {
        format!(" on {road}")
    }
}

fn render_phrase(phrase: &Phrase) -> String {
    match phrase {
        Phrase::Turn {
            direction: d,
            distance: Some(m),
            street,
        } => format!("in {} {}{}", distance(*m), direction(*d), onto(street)),
        Phrase::Turn {
            direction: d,
            distance: None,
            street,
        } => format!("{}{}", direction(*d), onto(street)),
        Phrase::PrepareTurn {
            direction: d,
            distance: m,
            street,
        } => format!("after {} {}{}", distance(*m), direction(*d), onto(street)),
        Phrase::Roundabout {
            distance: m,
            exit,
            street,
            ..
        } => {
            let lead = m.map(|m| format!("in {} ", distance(m))).unwrap_or_default();
            format!(
                "{lead}enter the roundabout and take the {} exit{}",
                ordinal(*exit),
                onto(street)
            )
        }
        Phrase::PrepareRoundabout {
            distance: m,
            exit,
            street,
        } => format!(
            "after {} enter the roundabout and take the {} exit{}",
            distance(*m),
            ordinal(*exit),
            onto(street)
        ),
        Phrase::MakeUTurn {
            distance: m,
            street,
        } => {
            let lead = m.map(|m| format!("in {} ", distance(m))).unwrap_or_default();
            format!("{lead}make a U-turn{}", onto(street))
        }
        Phrase::PrepareMakeUTurn {
            distance: m,
            street,
        } => format!("after {} make a U-turn{}", distance(*m), onto(street)),
        Phrase::MakeUTurnAtWaypoint => "make a U-turn when possible".to_string(),
        Phrase::GoAhead {
            distance: Some(m),
            street,
        } => format!("continue for {}{}", distance(*m), on(street)),
        Phrase::GoAhead {
            distance: None,
            street,
        } => format!("continue straight{}", on(street)),
        Phrase::Then => "then".to_string(),
        Phrase::BearLeft { street } => format!("bear left{}", onto(street)),
        Phrase::BearRight { street } => format!("bear right{}", onto(street)),
        Phrase::AndArriveAtDestination { name } => format!("and arrive at your destination {name}"),
        Phrase::AndArriveAtIntermediatePoint { name } => {
            format!("and arrive at your intermediate point {name}")
        }
        Phrase::AndArriveAtWaypoint { name } => format!("and pass waypoint {name}"),
        Phrase::AndArriveAtFavorite { name } => format!("and pass favorite {name}"),
        Phrase::AndArriveAtPoi { name } => format!("and pass {name}"),
        Phrase::ArrivedAtDestination { name } => format!("you have arrived at your destination {name}"),
        Phrase::ArrivedAtIntermediatePoint { name } => {
            format!("you have arrived at your intermediate point {name}")
        }
        Phrase::ArrivedAtWaypoint { name } => format!("you are passing waypoint {name}"),
        Phrase::ArrivedAtFavorite { name } => format!("you are passing favorite {name}"),
        Phrase::ArrivedAtPoi { name } => format!("you are passing {name}"),
        Phrase::OffRoute { distance: m } => format!("you have been off the route for {}", distance(*m)),
        Phrase::BackOnRoute => "you are back on the route".to_string(),
        Phrase::Attention { alarm } => {
            format!("attention, {}", alarm.name().replace('_', " ").to_lowercase())
        }
        Phrase::SpeedAlarm { max_speed, .. } => format!("you are exceeding the speed limit of {max_speed}"),
        Phrase::RouteCalculated {
            distance: m,
            time_secs,
        } => format!(
            "route calculated, {}, {}",
            distance(f64::from(*m)),
            duration(*time_secs)
        ),
        Phrase::RouteRecalculated {
            distance: m,
            time_secs,
        } => format!(
            "route recalculated, {}, {}",
            distance(f64::from(*m)),
            duration(*time_secs)
        ),
        Phrase::GpsLocationLost => "GPS signal lost".to_string(),
        Phrase::GpsLocationRecover => "GPS signal recovered".to_string(),
    }
}
