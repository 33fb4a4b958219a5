//! # matchpoint-core
//!
//! This crate contains the engine behind a MatchPoint single elimination tournament: seeding the
//! players, laying out the bracket including byes, running the individual matchups and reporting
//! the final result.
//!
//! Important types:
//! - [`Tournament`]: The aggregate owning the seeded players and the bracket. All matchup
//! operations go through it.
//! - [`Bracket`]: All matchups of the tournament stored in a single `Vec`, round by round.
//! - [`Matchup`]: One contest between two [`EntrantSpot`]s.
//! - [`EntrantSpot`]: A *spot* within a matchup, which can contain an entrant, a bye or a
//! to-be-done spot.
//! - [`Node`]: The data stored in every spot that contains an entrant. Includes a reference to the
//! player.
//! - [`Session`]: Wraps a [`Tournament`] and asks an [`Interaction`] for confirmation before
//! mutating it.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to almost all types.
//!
pub mod placement;
pub mod render;
pub mod results;
pub mod seeding;
pub mod session;
pub mod structure;

mod bracket;
mod matchup;
mod tournament;
mod utils;

pub use bracket::{Bracket, BracketOptions, MatchResult, MatchupId, ParseMatchupIdError};
pub use matchup::{
    MatchState, Matchup, ParseScoringModeError, ParseSideError, Scoring, ScoringMode, SetScore,
    Side,
};
pub use seeding::{seed_players, Player, SeedingMode};
pub use session::{Interaction, Session};
pub use structure::BracketStructure;
pub use tournament::Tournament;

use thiserror::Error;

use std::ops::Deref;
use std::result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A wrapper around a `Vec<T>` where `T` should be considered an entrant for a tournament.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T, U> PartialEq<U> for Entrants<T>
where
    T: PartialEq,
    U: AsRef<[T]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.entrants == other.as_ref()
    }
}

impl<T> Eq for Entrants<T> where T: Eq {}

impl<T> AsRef<[T]> for Entrants<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.entrants
    }
}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// The data stored for each spot in a matchup that contains an entrant.
///
/// `Node` refers to the entrant by its index in the [`Entrants`] list. It never contains data
/// directly related to the entrant (like the name), so advancing a winner only copies the index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    index: usize,
    pub winner: bool,
}

impl Node {
    /// Creates a new `Node` for the entrant at `index` that has not won.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            winner: false,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A spot for an entrant in the bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    /// A permanently empty spot. The opponent advances without playing.
    Bye,
    /// A spot waiting for the winner of a previous matchup.
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Returns `true` if the `EntrantSpot` is [`Bye`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use matchpoint_core::EntrantSpot;
    /// let spot: EntrantSpot<()> = EntrantSpot::Bye;
    /// assert!(spot.is_bye());
    /// ```
    ///
    /// [`Bye`]: Self::Bye
    pub fn is_bye(&self) -> bool {
        matches!(self, Self::Bye)
    }

    /// Returns `true` if the `EntrantSpot` is [`TBD`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use matchpoint_core::EntrantSpot;
    /// let spot: EntrantSpot<()> = EntrantSpot::TBD;
    /// assert!(spot.is_tbd());
    /// ```
    ///
    /// [`TBD`]: Self::TBD
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Maps `EntrantSpot<T>` to `EntrantSpot<U>` by applying `f` on it.
    pub fn map<U, F>(self, f: F) -> EntrantSpot<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Entrant(entrant) => EntrantSpot::Entrant(f(entrant)),
            Self::Bye => EntrantSpot::Bye,
            Self::TBD => EntrantSpot::TBD,
        }
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

/// The reasons an operation was not applied. The tournament is never changed when an operation
/// returns an error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("need at least 2 players, found {found}")]
    NotEnoughPlayers { found: usize },
    #[error("invalid number of matches: expected {expected}, found {found}")]
    InvalidNumberOfMatches { expected: usize, found: usize },
    #[error(
        "invalid entrant: match refers to entrant at {index} but only {length} entrants are given"
    )]
    InvalidEntrant { index: usize, length: usize },
    #[error("invalid bracket: match at {index} is not linked to the expected match")]
    InvalidLink { index: usize },
    #[error("no matchup with id {0}")]
    InvalidMatchup(MatchupId),
    #[error("matchup {0} is already completed")]
    Completed(MatchupId),
    #[error("matchup {0} is a bye match")]
    ByeMatch(MatchupId),
    #[error("matchup {0} is not a bye match")]
    NotByeMatch(MatchupId),
    #[error("matchup {0} is waiting for players")]
    NotPlayable(MatchupId),
    #[error("matchup {id} uses {found} scoring, expected {expected}")]
    ScoringMode {
        id: MatchupId,
        expected: ScoringMode,
        found: ScoringMode,
    },
    #[error("matchup {0} has no score, choose points or sets scoring first")]
    Unscored(MatchupId),
    #[error("cannot determine winner - scores are tied")]
    Tied,
    #[error("points cannot become negative")]
    NegativePoints,
    #[error("points cannot exceed {}", u32::MAX)]
    PointsOverflow,
    #[error("invalid set {index}: matchup has {length} sets")]
    InvalidSet { index: usize, length: usize },
    #[error("cancelled")]
    Cancelled,
}
