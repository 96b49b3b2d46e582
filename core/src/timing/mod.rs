//! Announcement timing
//!
//! Thresholds per vehicle class and the distance-vs-threshold comparator.

mod profile;

pub use profile::TimingProfile;

/// Coarse classification of how close the next maneuver is, for widgets
/// that change appearance as a turn approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Imminence {
    Turn,
    Prepare,
    LongPrepare,
    Far,
}

