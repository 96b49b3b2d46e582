use crate::error::CueError;

/// Short sound played before waypoint and favorite announcements.
///
/// Best effort: the engine logs failures and speaks the announcement anyway.
pub trait CuePlayer: Send {
    fn play_cue(&self) -> Result<(), CueError>;
}
