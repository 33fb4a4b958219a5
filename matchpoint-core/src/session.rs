//! Confirmed matchup operations.
//!
//! A [`Session`] asks its [`Interaction`] before every state change. Declining a confirmation or
//! entering no valid score cancels the operation with [`Error::Cancelled`], leaving the
//! tournament untouched.
use crate::{Error, MatchupId, Result, SetScore, Side, Tournament};

/// The questions a [`Session`] asks the user.
pub trait Interaction {
    /// Asks a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Asks for a score, suggesting `current`. Returns `None` if the input was invalid or the
    /// user cancelled.
    fn score(&mut self, message: &str, current: u32) -> Option<u32>;
}

impl<T> Interaction for &mut T
where
    T: Interaction + ?Sized,
{
    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn score(&mut self, message: &str, current: u32) -> Option<u32> {
        (**self).score(message, current)
    }
}

#[derive(Debug)]
pub struct Session<'a, I>
where
    I: Interaction,
{
    tournament: &'a mut Tournament,
    interaction: I,
}

impl<'a, I> Session<'a, I>
where
    I: Interaction,
{
    pub fn new(tournament: &'a mut Tournament, interaction: I) -> Self {
        Self {
            tournament,
            interaction,
        }
    }

    #[inline]
    pub fn tournament(&self) -> &Tournament {
        self.tournament
    }

    fn confirm(&mut self, message: &str) -> Result<()> {
        if self.interaction.confirm(message) {
            Ok(())
        } else {
            log::debug!("Cancelled: {}", message);
            Err(Error::Cancelled)
        }
    }

    pub fn set_winner_basic(&mut self, id: MatchupId, side: Side) -> Result<()> {
        let m = self.tournament.matchup(id)?;
        m.ensure_playable()?;

        let message = format!("Set {} as winner?", self.tournament.name(m.entrant(side)));
        self.confirm(&message)?;

        self.tournament.set_winner_basic(id, side)
    }

    pub fn reopen_match(&mut self, id: MatchupId) -> Result<()> {
        self.tournament.matchup(id)?;
        self.confirm("Reopen this match? This will clear the winner.")?;

        self.tournament.reopen_match(id)
    }

    /// Asks for the new scores of both players of the set at `index`.
    pub fn edit_set(&mut self, id: MatchupId, index: usize) -> Result<()> {
        let m = self.tournament.matchup(id)?;
        m.ensure_playable()?;

        let sets = m.scoring().sets();
        let current = *sets.get(index).ok_or(Error::InvalidSet {
            index,
            length: sets.len(),
        })?;

        let first = format!(
            "Enter score for {}:",
            self.tournament.name(m.entrant(Side::Player1))
        );
        let second = format!(
            "Enter score for {}:",
            self.tournament.name(m.entrant(Side::Player2))
        );

        let player1 = self
            .interaction
            .score(&first, current.player1)
            .ok_or(Error::Cancelled)?;
        let player2 = self
            .interaction
            .score(&second, current.player2)
            .ok_or(Error::Cancelled)?;

        self.tournament
            .edit_set(id, index, SetScore::new(player1, player2))
    }

    /// Asks to declare the side with the higher score as the winner.
    pub fn complete_match(&mut self, id: MatchupId) -> Result<()> {
        let m = self.tournament.matchup(id)?;
        let side = m.decide()?;

        let message = format!("Declare {} as winner?", self.tournament.name(m.entrant(side)));
        self.confirm(&message)?;

        self.tournament.complete_match(id)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.confirm("Are you sure you want to reset the bracket? All progress will be lost.")?;

        self.tournament.reset()
    }
}
