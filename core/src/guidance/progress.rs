//! Announcement progress for the upcoming maneuver

use crate::route::ManeuverId;

/// Escalation stage of the announcements for one maneuver.
///
/// Ordered: `UTurnWaypointTold < Unknown < LongPrepare < ... < Told`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Side state: a U-turn at a waypoint was announced; repeats replay it
    UTurnWaypointTold,
    Unknown,
    LongPrepare,
    Prepare,
    TurnIn,
    Turn,
    Told,
}

impl Tier {
    /// The tier after this one, saturating at `Told`
    pub fn advance(self) -> Tier {
        match self {
            Tier::UTurnWaypointTold => Tier::Unknown,
            Tier::Unknown => Tier::LongPrepare,
            Tier::LongPrepare => Tier::Prepare,
            Tier::Prepare => Tier::TurnIn,
            Tier::TurnIn => Tier::Turn,
            Tier::Turn | Tier::Told => Tier::Told,
        }
    }

    /// The prompt for `stage` has not been passed yet
    pub fn not_passed(self, stage: Tier) -> bool {
        self <= stage
    }
}

/// "Continue for ..." arming state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoAheadArm {
    Disarmed,
    /// A new route was calculated: arm on the next fresh maneuver regardless of distance
    ForceRearm,
    /// Speak once the distance to the maneuver drops below this value
    Armed(i32),
}

/// Progress bound to the current upcoming maneuver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementProgress {
    maneuver: Option<ManeuverId>,
    tier: Tier,
    arrival_announced: bool,
    suppress_destination: bool,
    go_ahead: GoAheadArm,
}

impl Default for AnnouncementProgress {
    fn default() -> Self {
        Self {
            maneuver: None,
            tier: Tier::Unknown,
            arrival_announced: false,
            suppress_destination: false,
            go_ahead: GoAheadArm::Disarmed,
        }
    }
}

impl AnnouncementProgress {
    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn maneuver(&self) -> Option<ManeuverId> {
        self.maneuver
    }

    pub fn arrival_announced(&self) -> bool {
        self.arrival_announced
    }

    pub fn suppress_destination(&self) -> bool {
        self.suppress_destination
    }

    pub fn go_ahead(&self) -> GoAheadArm {
        self.go_ahead
    }

    /// Bind to `id`. Returns true when the maneuver changed and progress was reset.
    pub fn observe(&mut self, id: ManeuverId) -> bool {
        if self.maneuver == Some(id) {
            return false;
        }
        self.maneuver = Some(id);
        self.tier = Tier::Unknown;
        self.suppress_destination = false;
        self.arrival_announced = false;
        if self.go_ahead != GoAheadArm::ForceRearm {
            self.go_ahead = GoAheadArm::Disarmed;
        }
        true
    }

    /// Forget the bound maneuver after a route (re)calculation
    pub fn reset_for_route(&mut self, new_route: bool) {
        if new_route {
            self.go_ahead = GoAheadArm::ForceRearm;
        }
        self.tier = Tier::Unknown;
        self.suppress_destination = false;
        self.maneuver = None;
    }

    /// Move past the prompt of `stage`. Never moves backwards.
    pub fn complete(&mut self, stage: Tier) {
        self.tier = self.tier.max(stage.advance());
    }

    pub fn enter_u_turn_waypoint(&mut self) {
        self.tier = Tier::UTurnWaypointTold;
    }

    pub fn set_suppress_destination(&mut self, suppress: bool) {
        self.suppress_destination = suppress;
    }

    pub fn mark_arrival_announced(&mut self) {
        self.arrival_announced = true;
    }

    /// Arm "continue for" at `distance - 3 * turn` on a fresh maneuver, if
    /// forced by a new route or the turn is beyond the long-prepare range.
    pub fn arm_go_ahead(&mut self, distance: i32, turn: u32, prepare_long: u32) {
        if self.go_ahead == GoAheadArm::ForceRearm || i64::from(distance) > i64::from(prepare_long) {
            self.go_ahead = GoAheadArm::Armed(distance - 3 * turn as i32);
        }
    }

    pub fn go_ahead_reached(&self, distance: i32) -> bool {
        matches!(self.go_ahead, GoAheadArm::Armed(at) if distance < at)
    }

    pub fn disarm_go_ahead(&mut self) {
        self.go_ahead = GoAheadArm::Disarmed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_saturates() {
        assert_eq!(Tier::Unknown.advance(), Tier::LongPrepare);
        assert_eq!(Tier::Turn.advance(), Tier::Told);
        assert_eq!(Tier::Told.advance(), Tier::Told);
    }

    #[test]
    fn complete_never_regresses() {
        let mut progress = AnnouncementProgress::default();
        progress.complete(Tier::Turn);
        assert_eq!(progress.tier(), Tier::Told);
        progress.complete(Tier::Prepare);
        assert_eq!(progress.tier(), Tier::Told);
    }

    #[test]
    fn maneuver_change_resets() {
        let mut progress = AnnouncementProgress::default();
        assert!(progress.observe(ManeuverId::new(1, 0)));
        progress.complete(Tier::TurnIn);
        progress.set_suppress_destination(true);
        progress.mark_arrival_announced();

        assert!(!progress.observe(ManeuverId::new(1, 0)));
        assert_eq!(progress.tier(), Tier::Turn);

        assert!(progress.observe(ManeuverId::new(1, 1)));
        assert_eq!(progress.tier(), Tier::Unknown);
        assert!(!progress.suppress_destination());
        assert!(!progress.arrival_announced());
    }

    #[test]
    fn force_rearm_survives_maneuver_change() {
        let mut progress = AnnouncementProgress::default();
        progress.reset_for_route(true);
        progress.observe(ManeuverId::new(2, 0));
        assert_eq!(progress.go_ahead(), GoAheadArm::ForceRearm);

        // Close turn still arms when forced
        progress.arm_go_ahead(400, 50, 3500);
        assert_eq!(progress.go_ahead(), GoAheadArm::Armed(250));
        assert!(progress.go_ahead_reached(249));
        assert!(!progress.go_ahead_reached(250));
    }

    #[test]
    fn arming_requires_far_turn_without_force() {
        let mut progress = AnnouncementProgress::default();
        progress.arm_go_ahead(400, 50, 3500);
        assert_eq!(progress.go_ahead(), GoAheadArm::Disarmed);
        progress.arm_go_ahead(5000, 50, 3500);
        assert_eq!(progress.go_ahead(), GoAheadArm::Armed(4850));
    }
}
