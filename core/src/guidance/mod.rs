//! Turn-by-turn announcement state machine
//!
//! `GuidanceEngine` owns the escalation tiers for the upcoming maneuver, the
//! alarm throttles and the command sink. `GuidanceHandle` shares one engine
//! between the position-update path and on-demand repeat requests.

mod engine;
mod handle;
mod progress;

pub use engine::{GuidanceEngine, PointKind};
pub use handle::GuidanceHandle;
pub use progress::{AnnouncementProgress, GoAheadArm, Tier};
