//! Turn descriptors
//!
//! `TurnKind` is the closed set of maneuvers the router can emit.
//! `TurnDirection` is the subset that is spoken as a plain "turn <dir>".

use serde::{Deserialize, Serialize};

/// How tight a left/right turn is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sharpness {
    Slight,
    #[default]
    Normal,
    Sharp,
}

/// A maneuver's turn descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnKind {
    /// Continue straight; never pronounced on its own
    Straight,
    Left {
        #[serde(default)]
        sharpness: Sharpness,
    },
    Right {
        #[serde(default)]
        sharpness: Sharpness,
    },
    KeepLeft,
    KeepRight,
    /// U-turn to the left (right-hand traffic)
    UTurn,
    /// U-turn to the right (left-hand traffic)
    UTurnRight,
    Roundabout {
        /// 1-based exit index
        exit: u8,
        /// Bearing change through the roundabout in degrees
        #[serde(default)]
        angle: f32,
    },
}

/// Direction parameter of a spoken "turn" / "prepare turn" phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    LeftSharp,
    LeftSlight,
    Right,
    RightSharp,
    RightSlight,
    LeftKeep,
    RightKeep,
}

impl TurnDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnDirection::Left => "left",
            TurnDirection::LeftSharp => "left_sh",
            TurnDirection::LeftSlight => "left_sl",
            TurnDirection::Right => "right",
            TurnDirection::RightSharp => "right_sh",
            TurnDirection::RightSlight => "right_sl",
            TurnDirection::LeftKeep => "left_keep",
            TurnDirection::RightKeep => "right_keep",
        }
    }
}

impl TurnKind {
    pub fn left() -> Self {
        TurnKind::Left {
            sharpness: Sharpness::Normal,
        }
    }

    pub fn right() -> Self {
        TurnKind::Right {
            sharpness: Sharpness::Normal,
        }
    }

    /// Straight-ahead maneuvers are not announced by themselves
    pub fn is_straight(&self) -> bool {
        matches!(self, TurnKind::Straight)
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, TurnKind::KeepLeft | TurnKind::KeepRight)
    }

    pub fn is_u_turn(&self) -> bool {
        matches!(self, TurnKind::UTurn | TurnKind::UTurnRight)
    }

    /// Direction for a plain turn phrase. Roundabouts, U-turns and
    /// straights have their own phrases and return `None`.
    pub fn direction(&self) -> Option<TurnDirection> {
        let direction = match self {
            TurnKind::Left { sharpness } => match sharpness {
                Sharpness::Slight => TurnDirection::LeftSlight,
                Sharpness::Normal => TurnDirection::Left,
                Sharpness::Sharp => TurnDirection::LeftSharp,
            },
            TurnKind::Right { sharpness } => match sharpness {
                Sharpness::Slight => TurnDirection::RightSlight,
                Sharpness::Normal => TurnDirection::Right,
                Sharpness::Sharp => TurnDirection::RightSharp,
            },
            TurnKind::KeepLeft => TurnDirection::LeftKeep,
            TurnKind::KeepRight => TurnDirection::RightKeep,
            TurnKind::Straight
            | TurnKind::UTurn
            | TurnKind::UTurnRight
            | TurnKind::Roundabout { .. } => return None,
        };
        Some(direction)
    }

    /// Side of a "then bear ..." hint for this turn, if it has one.
    pub fn bearing_side(&self) -> Option<BearSide> {
        match self {
            TurnKind::Left { .. } | TurnKind::KeepLeft | TurnKind::UTurn => Some(BearSide::Left),
            TurnKind::Right { .. } | TurnKind::KeepRight | TurnKind::UTurnRight => {
                Some(BearSide::Right)
            }
            TurnKind::Straight | TurnKind::Roundabout { .. } => None,
        }
    }
}

/// Side named by a "then bear left/right" hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearSide {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_turns_have_directions() {
        let sharp_left = TurnKind::Left {
            sharpness: Sharpness::Sharp,
        };
        assert_eq!(sharp_left.direction(), Some(TurnDirection::LeftSharp));
        assert_eq!(TurnKind::KeepRight.direction(), Some(TurnDirection::RightKeep));
        assert_eq!(TurnKind::UTurn.direction(), None);
        assert_eq!(TurnKind::Straight.direction(), None);
    }

    #[test]
    fn bearing_sides() {
        assert_eq!(TurnKind::UTurn.bearing_side(), Some(BearSide::Left));
        assert_eq!(TurnKind::KeepRight.bearing_side(), Some(BearSide::Right));
        assert_eq!(
            TurnKind::Roundabout { exit: 2, angle: 90.0 }.bearing_side(),
            None
        );
    }

    #[test]
    fn deserializes_tagged() {
        #[derive(Deserialize)]
        struct Wrap {
            turn: TurnKind,
        }
        let w: Wrap = toml::from_str("turn = { type = \"roundabout\", exit = 3 }").unwrap();
        assert_eq!(w.turn, TurnKind::Roundabout { exit: 3, angle: 0.0 });
        let w: Wrap = toml::from_str("turn = { type = \"left\" }").unwrap();
        assert_eq!(w.turn, TurnKind::left());
    }
}
