use chrono::{DateTime, Utc};

use crate::render::{BracketRounds, Renderer};
use crate::results::{self, MatchReport, TournamentResult};
use crate::{
    Bracket, BracketOptions, BracketStructure, EntrantSpot, Entrants, Matchup, MatchupId, Node,
    Player, Result, ScoringMode, SetScore, Side,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single elimination tournament: the seeded players together with their bracket.
///
/// All matchup operations go through the `Tournament`. A rejected operation returns an
/// [`Error`] and leaves the tournament untouched.
///
/// [`Error`]: crate::Error
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tournament {
    players: Entrants<Player>,
    bracket: Bracket,
    #[cfg_attr(feature = "serde", serde(default))]
    options: BracketOptions,
}

impl Tournament {
    /// Creates a new `Tournament` with a fresh bracket for the seed-sorted `players`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughPlayers`] if less than 2 players are given.
    ///
    /// [`Error::NotEnoughPlayers`]: crate::Error::NotEnoughPlayers
    pub fn new(players: Entrants<Player>, options: BracketOptions) -> Result<Self> {
        let bracket = Bracket::new(&players, options)?;

        Ok(Self {
            players,
            bracket,
            options,
        })
    }

    /// Checks that a deserialized tournament is consistent.
    pub fn validate(&self) -> Result<()> {
        self.bracket.validate(self.players.len())
    }

    #[inline]
    pub fn players(&self) -> &Entrants<Player> {
        &self.players
    }

    #[inline]
    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    #[inline]
    pub fn structure(&self) -> BracketStructure {
        BracketStructure::new(self.players.len())
    }

    /// Returns the matchup with the given `id`.
    pub fn matchup(&self, id: MatchupId) -> Result<&Matchup> {
        self.bracket.get(id).ok_or(crate::Error::InvalidMatchup(id))
    }

    /// Returns the player in `spot`.
    #[inline]
    pub fn player(&self, spot: &EntrantSpot<Node>) -> Option<&Player> {
        match spot {
            EntrantSpot::Entrant(node) => self.players.get(node.index()),
            _ => None,
        }
    }

    /// Returns the display name of `spot`: the player name, `"BYE"` or `"TBD"`.
    pub fn name<'a>(&'a self, spot: &EntrantSpot<Node>) -> &'a str {
        match spot {
            EntrantSpot::Entrant(node) => self
                .players
                .get(node.index())
                .map(|player| player.name.as_str())
                .unwrap_or("TBD"),
            EntrantSpot::Bye => "BYE",
            EntrantSpot::TBD => "TBD",
        }
    }

    /// Returns the display name of the 0-based `round`.
    pub fn round_name(&self, round: usize) -> String {
        results::round_name(round, self.bracket.total_rounds(), self.players.len())
    }

    /// Picks `side` as the winner of a basic matchup and advances it.
    pub fn set_winner_basic(&mut self, id: MatchupId, side: Side) -> Result<()> {
        self.complete_with(id, |m| m.set_winner(side))
    }

    /// Advances the player of a bye matchup.
    pub fn complete_bye(&mut self, id: MatchupId) -> Result<()> {
        self.complete_with(id, |m| m.complete_bye())
    }

    /// Completes a points or sets matchup, the side with the higher score advancing.
    pub fn complete_match(&mut self, id: MatchupId) -> Result<()> {
        self.complete_with(id, |m| m.complete_match().map(|_| ()))
    }

    /// Clears the winner of a matchup. A winner that has already advanced is not removed from
    /// the following matchup.
    pub fn reopen_match(&mut self, id: MatchupId) -> Result<()> {
        self.modify(id, |m| {
            m.reopen();
            Ok(())
        })
    }

    /// Adds `delta` to the points of `side`.
    pub fn change_points(&mut self, id: MatchupId, side: Side, delta: i64) -> Result<()> {
        self.modify(id, |m| m.change_points(side, delta))
    }

    pub fn add_set(&mut self, id: MatchupId) -> Result<()> {
        self.modify(id, |m| m.add_set())
    }

    /// Overwrites the set at the 0-based `index`.
    pub fn edit_set(&mut self, id: MatchupId, index: usize, score: SetScore) -> Result<()> {
        self.modify(id, |m| m.edit_set(index, score))
    }

    /// Switches the scoring of a matchup, discarding all previous scores.
    pub fn set_scoring_mode(&mut self, id: MatchupId, mode: ScoringMode) -> Result<()> {
        self.modify(id, |m| m.set_scoring_mode(mode))
    }

    /// Throws away all progress and rebuilds the bracket from the players.
    pub fn reset(&mut self) -> Result<()> {
        log::debug!("Resetting bracket of {} players", self.players.len());

        self.bracket = Bracket::new(&self.players, self.options)?;
        Ok(())
    }

    fn complete_with<F>(&mut self, id: MatchupId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Matchup) -> Result<()>,
    {
        let res = self.bracket.update_match(id, |m, result| {
            f(m)?;

            if let Some(spot) = m.advancing() {
                result.winner(spot);
            }

            Ok(())
        });

        if let Err(err) = &res {
            log::debug!("Rejected completion of {}: {}", id, err);
        }

        res
    }

    fn modify<F>(&mut self, id: MatchupId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Matchup) -> Result<()>,
    {
        let res = self.bracket.update_match(id, |m, _| f(m));

        if let Err(err) = &res {
            log::debug!("Rejected update of {}: {}", id, err);
        }

        res
    }

    /// Returns `true` if the championship is decided.
    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Returns the winner of the championship.
    pub fn champion(&self) -> Option<&Player> {
        let m = self.bracket.final_matchup().filter(|m| m.is_completed())?;
        let side = m.winner()?;

        self.player(m.entrant(side))
    }

    /// Returns the loser of the championship.
    pub fn runner_up(&self) -> Option<&Player> {
        let m = self.bracket.final_matchup().filter(|m| m.is_completed())?;
        let side = m.winner()?;

        self.player(m.entrant(side.other()))
    }

    /// Returns the reports of all decided matchups.
    pub fn match_results(&self) -> Vec<MatchReport> {
        results::match_reports(self)
    }

    /// Returns the final result, dated now. Returns `None` while the championship is open.
    pub fn result(&self) -> Option<TournamentResult> {
        self.result_at(Utc::now())
    }

    pub fn result_at(&self, win_date: DateTime<Utc>) -> Option<TournamentResult> {
        TournamentResult::new(self, win_date)
    }

    pub fn render<R>(&self, renderer: &mut R)
    where
        R: Renderer,
    {
        renderer.render(BracketRounds::new(self));
    }
}
