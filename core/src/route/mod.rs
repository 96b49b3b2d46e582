//! Route-side data model
//!
//! - **Maneuvers**: turn descriptors and road-name metadata
//! - **Source**: the lookahead interface the engine reads each tick
//! - **Planned routes**: an in-memory source built from a scripted list
//!   of maneuvers (used by the simulator and tests)

mod maneuver;
mod planned;
mod source;
mod turn;

pub use maneuver::{
    LocalizedName, Maneuver, ManeuverAhead, ManeuverId, RoadSegment, Target, TargetKind,
    is_target_point,
};
pub use planned::{PlannedManeuver, PlannedRoute};
pub use source::ManeuverSource;
pub use turn::{BearSide, Sharpness, TurnDirection, TurnKind};
