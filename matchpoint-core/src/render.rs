//! # Bracket Rendering
//!
//! The `render` module provides the types handed to a [`Renderer`] to draw a [`Tournament`].
//!
//! A bracket is rendered round by round:
//! - [`BracketRounds`] iterates over all rounds, starting with the first round.
//! - A [`Round`] contains the round title and its matchups.
//! - A [`MatchupView`] resolves the names and scores of one matchup.
use crate::{MatchState, Matchup, Player, Side, Tournament};

/// A renderer used to render a [`Tournament`].
pub trait Renderer {
    fn render(&mut self, input: BracketRounds<'_>);
}

/// An iterator over all [`Round`]s of a [`Tournament`].
#[derive(Clone, Debug)]
pub struct BracketRounds<'a> {
    tournament: &'a Tournament,
    round: usize,
}

impl<'a> BracketRounds<'a> {
    pub(crate) fn new(tournament: &'a Tournament) -> Self {
        Self {
            tournament,
            round: 0,
        }
    }
}

impl<'a> Iterator for BracketRounds<'a> {
    type Item = Round<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let matchups = self.tournament.bracket().round(self.round)?;

        let round = Round {
            tournament: self.tournament,
            index: self.round,
            name: self.tournament.round_name(self.round),
            matchups,
        };

        self.round += 1;
        Some(round)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self
            .tournament
            .bracket()
            .total_rounds()
            .saturating_sub(self.round);
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for BracketRounds<'a> {}

#[derive(Clone, Debug)]
pub struct Round<'a> {
    tournament: &'a Tournament,
    index: usize,
    name: String,
    matchups: &'a [Matchup],
}

impl<'a> Round<'a> {
    /// Returns the 0-based index of the round.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the title of the round, e.g. `"Semi-Finals"`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matchups(&self) -> impl Iterator<Item = MatchupView<'a>> + 'a {
        let tournament = self.tournament;
        let matchups = self.matchups;

        matchups
            .iter()
            .map(move |matchup| MatchupView { tournament, matchup })
    }
}

#[derive(Copy, Clone, Debug)]
pub struct MatchupView<'a> {
    tournament: &'a Tournament,
    matchup: &'a Matchup,
}

impl<'a> MatchupView<'a> {
    #[inline]
    pub fn matchup(&self) -> &'a Matchup {
        self.matchup
    }

    /// Returns the name shown for `side`: the player name, `"BYE"` or `"TBD"`.
    #[inline]
    pub fn name(&self, side: Side) -> &'a str {
        self.tournament.name(self.matchup.entrant(side))
    }

    #[inline]
    pub fn player(&self, side: Side) -> Option<&'a Player> {
        self.tournament.player(self.matchup.entrant(side))
    }

    /// Returns `true` if `side` won the matchup.
    pub fn is_winner(&self, side: Side) -> bool {
        self.matchup.winner() == Some(side)
    }

    /// Returns the points or sets won of `side`. `None` for basic matchups.
    #[inline]
    pub fn score(&self, side: Side) -> Option<u32> {
        self.matchup
            .scoring()
            .score()
            .map(|score| score[side.index()])
    }

    #[inline]
    pub fn state(&self) -> MatchState {
        self.matchup.state()
    }
}
