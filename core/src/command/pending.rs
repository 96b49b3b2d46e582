use crate::route::ManeuverSource;

use super::{Phrase, Utterance};

/// Route notice that could not be spoken because no sink was attached.
///
/// At most one is held (latest wins) and it is flushed exactly once when a
/// sink attaches. Distance and time are read from the route when the notice
/// is spoken, so a late flush reports what is actually left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    RouteCalculated,
    RouteRecalculated,
}

impl PendingCommand {
    pub fn new(new_route: bool) -> Self {
        if new_route {
            PendingCommand::RouteCalculated
        } else {
            PendingCommand::RouteRecalculated
        }
    }

    /// The notice to speak, or `None` when no route distance is left
    pub fn utterance(self, source: &dyn ManeuverSource) -> Option<Utterance> {
        let distance = source.left_distance();
        if distance == 0 {
            return None;
        }
        let time_secs = source.left_time();
        let phrase = match self {
            PendingCommand::RouteCalculated => Phrase::RouteCalculated {
                distance,
                time_secs,
            },
            PendingCommand::RouteRecalculated => Phrase::RouteRecalculated {
                distance,
                time_secs,
            },
        };
        Some(Utterance::new().with(phrase))
    }
}
