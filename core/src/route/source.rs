use super::{ManeuverAhead, RoadSegment};

/// Lookahead into the computed route.
///
/// Results must be stable between ticks: calling any method twice without
/// the vehicle moving returns the same values.
pub trait ManeuverSource {
    /// The upcoming maneuver and the distance to it from the current position.
    /// `None` when no route is active.
    fn next_maneuver(&self) -> Option<ManeuverAhead>;

    /// The maneuver following `ahead`, with the distance measured from
    /// `ahead` (not from the current position).
    fn maneuver_after(&self, ahead: &ManeuverAhead) -> Option<ManeuverAhead>;

    /// Road currently being driven, if known
    fn current_segment(&self) -> Option<RoadSegment>;

    /// Remaining route distance in meters
    fn left_distance(&self) -> u32;

    /// Remaining route time in seconds
    fn left_time(&self) -> u32;
}
