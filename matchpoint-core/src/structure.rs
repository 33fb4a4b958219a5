use crate::utils::NumExt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The shape of a single elimination bracket for a given number of players.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketStructure {
    /// The smallest power of two greater than or equal to the number of players.
    pub slot_count: usize,
    /// The number of slots that are filled with a bye.
    pub bye_count: usize,
    pub total_rounds: usize,
}

impl BracketStructure {
    pub fn new(player_count: usize) -> Self {
        let slot_count = player_count.next_power_of_two();

        Self {
            slot_count,
            bye_count: slot_count - player_count.max(1),
            total_rounds: slot_count.ilog2_ceil(),
        }
    }

    #[inline]
    pub fn first_round_matches(&self) -> usize {
        self.slot_count / 2
    }

    #[inline]
    pub fn has_byes(&self) -> bool {
        self.bye_count > 0
    }
}

/// Returns a short label describing the bracket for `player_count` players.
pub fn bracket_label(player_count: usize) -> &'static str {
    match player_count {
        0..=2 => "Final",
        3..=4 => "Semi-Finals",
        5..=8 => "Quarter-Finals",
        9..=16 => "Round of 16",
        17..=32 => "Round of 32",
        _ => "Single Elimination",
    }
}
