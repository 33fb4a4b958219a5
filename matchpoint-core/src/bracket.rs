use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use crate::placement::Placement;
use crate::{BracketStructure, EntrantSpot, Entrants, Error, Matchup, Node, Player, Result, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The identifier of a [`Matchup`]: its round and its position within that round, both 0-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchupId {
    pub round: usize,
    pub index: usize,
}

impl MatchupId {
    #[inline]
    pub const fn new(round: usize, index: usize) -> Self {
        Self { round, index }
    }
}

impl Display for MatchupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "round-{}-match-{}", self.round, self.index)
    }
}

impl FromStr for MatchupId {
    type Err = ParseMatchupIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("round-")
            .ok_or_else(|| ParseMatchupIdError::Format(s.to_owned()))?;
        let (round, index) = rest
            .split_once("-match-")
            .ok_or_else(|| ParseMatchupIdError::Format(s.to_owned()))?;

        Ok(Self {
            round: round.parse()?,
            index: index.parse()?,
        })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseMatchupIdError {
    #[error("invalid matchup id '{0}': expected round-<round>-match-<match>")]
    Format(String),
    #[error("invalid matchup id: {0}")]
    Int(#[from] ParseIntError),
}

/// Options changing how a [`Bracket`] is laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BracketOptions {
    /// Place the players using the standard placement table even if no byes are required.
    /// Without this option a full bracket pairs the players in seed order.
    pub standard_placement: bool,
}

/// The result of updating a [`Matchup`] with [`Bracket::update_match`].
#[derive(Clone, Debug, Default)]
pub struct MatchResult {
    pub(crate) winner: Option<EntrantSpot<Node>>,
}

impl MatchResult {
    #[inline]
    pub fn new() -> Self {
        Self { winner: None }
    }

    /// Sets the spot that advances into the next matchup.
    pub fn winner(&mut self, entrant: EntrantSpot<Node>) -> &mut Self {
        self.winner = Some(entrant);
        self
    }
}

/// A single elimination bracket.
///
/// All matchups are stored in one `Vec`, starting with the first round. A bracket with `n` slots
/// contains `n - 1` matchups, the first round has `n / 2` matchups and every following round
/// contains half the matchups of the previous one. The winner of the matchup at `index` advances
/// into the matchup at `n / 2 + index / 2`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bracket {
    matchups: Vec<Matchup>,
    slot_count: usize,
}

impl Bracket {
    /// Creates a new `Bracket` for the seed-sorted `players`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughPlayers`] if `players` contains less than 2 players.
    pub fn new(players: &Entrants<Player>, options: BracketOptions) -> Result<Self> {
        if players.len() < 2 {
            return Err(Error::NotEnoughPlayers {
                found: players.len(),
            });
        }

        let structure = BracketStructure::new(players.len());

        log::debug!(
            "Creating new bracket with {} players, {} slots and {} byes",
            players.len(),
            structure.slot_count,
            structure.bye_count
        );

        let slots = if structure.has_byes() || options.standard_placement {
            Self::place_slots(players.len(), structure.slot_count)
        } else {
            (0..players.len())
                .map(|index| EntrantSpot::Entrant(Node::new(index)))
                .collect()
        };

        let mut this = Self {
            matchups: Vec::with_capacity(structure.slot_count - 1),
            slot_count: structure.slot_count,
        };

        for (index, pair) in slots.chunks_exact(2).enumerate() {
            let id = MatchupId::new(0, index);
            let next = this.link(index);

            this.matchups.push(Matchup::new(id, [pair[0], pair[1]], next));
        }

        for round in 1..structure.total_rounds {
            for index in 0..this.round_size(round) {
                let id = MatchupId::new(round, index);
                let next = this.link(this.matchups.len());

                this.matchups
                    .push(Matchup::new(id, [EntrantSpot::TBD, EntrantSpot::TBD], next));
            }
        }

        // Advance the players with a bye into the second round.
        for index in 0..structure.first_round_matches() {
            if !this.matchups[index].is_bye() {
                continue;
            }

            if let Some(spot) = this.matchups[index].advancing() {
                this.advance(index, spot);
            }
        }

        log::debug!("Created new bracket with {} matchups", this.matchups.len());

        Ok(this)
    }

    /// Places every player into its slot. Slots without a player are byes.
    fn place_slots(player_count: usize, slot_count: usize) -> Vec<EntrantSpot<Node>> {
        let placement = Placement::new(slot_count);
        let mut slots = vec![EntrantSpot::Bye; slot_count];

        for index in 0..player_count {
            // The rank of a player is its 1-based position in the seed-sorted list.
            let position = placement
                .slot(index + 1)
                .filter(|position| *position <= slot_count && slots[*position - 1].is_bye())
                .map(|position| position - 1)
                .or_else(|| {
                    log::debug!("No slot for rank {}, using first free slot", index + 1);
                    slots.iter().position(EntrantSpot::is_bye)
                });

            if let Some(position) = position {
                slots[position] = EntrantSpot::Entrant(Node::new(index));
            }
        }

        slots
    }

    /// Returns the index of the matchup following the matchup at `index`.
    #[inline]
    fn link(&self, index: usize) -> Option<usize> {
        let next = self.slot_count / 2 + index / 2;
        (next < self.slot_count - 1).then_some(next)
    }

    /// Writes `spot` into the first TBD spot of the matchup following `index`.
    ///
    /// Matchups that end up with two byes have no one to advance, they are completed and the bye
    /// is forwarded further.
    fn advance(&mut self, mut index: usize, mut spot: EntrantSpot<Node>) {
        loop {
            let next = match self.matchups[index].next {
                Some(next) => next,
                None => return,
            };

            let r#match = &mut self.matchups[next];
            let position = match r#match.entrants.iter().position(EntrantSpot::is_tbd) {
                Some(position) => position,
                None => {
                    log::debug!(
                        "Matchup {} has no TBD spot, not advancing from {}",
                        r#match.id,
                        index
                    );
                    return;
                }
            };

            log::debug!("Advancing {:?} from {} into {}", spot, index, r#match.id);

            r#match.entrants[position] = spot;
            r#match.scoring.reset_side(Side::from_index(position));

            if !spot.is_bye() {
                return;
            }

            r#match.is_bye = true;
            if !r#match.entrants.iter().all(EntrantSpot::is_bye) {
                return;
            }

            r#match.completed = true;
            index = next;
            spot = EntrantSpot::Bye;
        }
    }

    /// Updates the matchup with the given `id` by applying `f` on it. If `f` succeeds and sets
    /// a winner on the [`MatchResult`], the winner is advanced into the next matchup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatchup`] if no matchup with `id` exists, or the error returned by
    /// `f`.
    pub fn update_match<F>(&mut self, id: MatchupId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Matchup, &mut MatchResult) -> Result<()>,
    {
        let index = self.position(id).ok_or(Error::InvalidMatchup(id))?;

        let mut result = MatchResult::new();
        f(&mut self.matchups[index], &mut result)?;

        if let Some(spot) = result.winner {
            self.advance(index, spot);
        }

        Ok(())
    }

    /// Checks that the bracket is consistent for `player_count` players. This should be used
    /// for brackets that were not created by [`Bracket::new`].
    pub fn validate(&self, player_count: usize) -> Result<()> {
        let structure = BracketStructure::new(player_count);
        let expected = structure.slot_count - 1;
        let found = self.matchups.len();

        if self.slot_count != structure.slot_count || found != expected {
            return Err(Error::InvalidNumberOfMatches { expected, found });
        }

        for (index, m) in self.matchups.iter().enumerate() {
            if m.next != self.link(index) || self.position(m.id) != Some(index) {
                return Err(Error::InvalidLink { index });
            }

            for entrant in m.entrants.iter() {
                if let EntrantSpot::Entrant(node) = entrant {
                    if node.index() >= player_count {
                        return Err(Error::InvalidEntrant {
                            index: node.index(),
                            length: player_count,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    #[inline]
    pub fn total_rounds(&self) -> usize {
        self.slot_count.trailing_zeros() as usize
    }

    /// Returns all matchups, round by round.
    #[inline]
    pub fn matchups(&self) -> &[Matchup] {
        &self.matchups
    }

    /// Returns the number of matchups in `round`.
    #[inline]
    pub fn round_size(&self, round: usize) -> usize {
        self.slot_count.checked_shr(round as u32 + 1).unwrap_or(0)
    }

    /// Returns the index of the first matchup in `round`.
    #[inline]
    fn round_offset(&self, round: usize) -> usize {
        self.slot_count - self.slot_count.checked_shr(round as u32).unwrap_or(0)
    }

    /// Returns the index of the matchup with the given `id`.
    pub fn position(&self, id: MatchupId) -> Option<usize> {
        if id.round >= self.total_rounds() || id.index >= self.round_size(id.round) {
            return None;
        }

        Some(self.round_offset(id.round) + id.index)
    }

    #[inline]
    pub fn get(&self, id: MatchupId) -> Option<&Matchup> {
        self.position(id).and_then(|index| self.matchups.get(index))
    }

    /// Returns the matchups of `round`.
    pub fn round(&self, round: usize) -> Option<&[Matchup]> {
        if round >= self.total_rounds() {
            return None;
        }

        let start = self.round_offset(round);
        self.matchups.get(start..start + self.round_size(round))
    }

    /// Returns the championship matchup.
    #[inline]
    pub fn final_matchup(&self) -> Option<&Matchup> {
        self.matchups.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{players, seed_players, SeedingMode};

    fn spot(index: usize) -> EntrantSpot<Node> {
        EntrantSpot::Entrant(Node::new(index))
    }

    fn winner(index: usize) -> EntrantSpot<Node> {
        EntrantSpot::Entrant(Node {
            index,
            winner: true,
        })
    }

    fn entrants(bracket: &Bracket) -> Vec<[EntrantSpot<Node>; 2]> {
        bracket.matchups().iter().map(|m| m.entrants).collect()
    }

    #[test]
    fn test_bracket_not_enough_players() {
        let empty: Entrants<Player> = Vec::new().into();
        assert_eq!(
            Bracket::new(&empty, BracketOptions::default()).unwrap_err(),
            Error::NotEnoughPlayers { found: 0 }
        );
        assert_eq!(
            Bracket::new(&players!["Alice"], BracketOptions::default()).unwrap_err(),
            Error::NotEnoughPlayers { found: 1 }
        );
    }

    #[test]
    fn test_bracket_two_players() {
        let bracket = Bracket::new(&players!["A", "B"], BracketOptions::default()).unwrap();

        assert_eq!(bracket.slot_count(), 2);
        assert_eq!(bracket.total_rounds(), 1);
        assert_eq!(entrants(&bracket), vec![[spot(0), spot(1)]]);
        assert_eq!(bracket.matchups()[0].next(), None);
        assert!(!bracket.matchups()[0].is_completed());
    }

    #[test]
    fn test_bracket_no_byes() {
        let bracket =
            Bracket::new(&players!["A", "B", "C", "D"], BracketOptions::default()).unwrap();

        // Full brackets pair the players in seed order.
        assert_eq!(
            entrants(&bracket),
            vec![
                [spot(0), spot(1)],
                [spot(2), spot(3)],
                [EntrantSpot::TBD, EntrantSpot::TBD],
            ]
        );
        assert_eq!(bracket.matchups()[0].next(), Some(2));
        assert_eq!(bracket.matchups()[1].next(), Some(2));
        assert_eq!(bracket.matchups()[2].next(), None);
    }

    #[test]
    fn test_bracket_standard_placement() {
        let options = BracketOptions {
            standard_placement: true,
        };
        let bracket = Bracket::new(&players!["A", "B", "C", "D"], options).unwrap();

        // Seed 1 faces seed 4, seed 3 faces seed 2.
        assert_eq!(
            entrants(&bracket),
            vec![
                [spot(0), spot(3)],
                [spot(2), spot(1)],
                [EntrantSpot::TBD, EntrantSpot::TBD],
            ]
        );
    }

    #[test]
    fn test_bracket_five_players() {
        let bracket = Bracket::new(
            &players!["A", "B", "C", "D", "E"],
            BracketOptions::default(),
        )
        .unwrap();

        assert_eq!(bracket.slot_count(), 8);
        assert_eq!(bracket.total_rounds(), 3);
        assert_eq!(bracket.matchups().len(), 7);

        // The top three seeds receive a bye and are advanced right away.
        assert_eq!(
            entrants(&bracket),
            vec![
                [winner(0), EntrantSpot::Bye],
                [spot(4), spot(3)],
                [winner(2), EntrantSpot::Bye],
                [EntrantSpot::Bye, winner(1)],
                [spot(0), EntrantSpot::TBD],
                [spot(2), spot(1)],
                [EntrantSpot::TBD, EntrantSpot::TBD],
            ]
        );

        let completed: Vec<bool> = bracket.matchups().iter().map(|m| m.is_completed()).collect();
        assert_eq!(completed, [true, false, true, true, false, false, false]);

        let byes: Vec<bool> = bracket.matchups().iter().map(|m| m.is_bye()).collect();
        assert_eq!(byes, [true, false, true, true, false, false, false]);
    }

    #[test]
    fn test_bracket_links() {
        for players in 2..=40 {
            let names: Vec<String> = (0..players).map(|n| n.to_string()).collect();
            let bracket = Bracket::new(
                &seed_players(&names, SeedingMode::Order),
                BracketOptions::default(),
            )
            .unwrap();

            let rounds: Vec<&[Matchup]> = (0..bracket.total_rounds())
                .filter_map(|round| bracket.round(round))
                .collect();
            assert_eq!(rounds.len(), bracket.total_rounds());
            assert_eq!(rounds.last().unwrap().len(), 1);
            for pair in rounds.windows(2) {
                assert_eq!(pair[0].len(), pair[1].len() * 2);
            }

            let mut predecessors = vec![0; bracket.matchups().len()];
            for (index, m) in bracket.matchups().iter().enumerate() {
                assert_eq!(bracket.position(m.id()), Some(index));

                match m.next() {
                    Some(next) => {
                        assert_eq!(bracket.matchups()[next].id().round, m.id().round + 1);
                        predecessors[next] += 1;
                    }
                    None => assert_eq!(index, bracket.matchups().len() - 1),
                }
            }

            for (index, count) in predecessors.into_iter().enumerate() {
                let expected = if bracket.matchups()[index].id().round == 0 {
                    0
                } else {
                    2
                };
                assert_eq!(count, expected);
            }

            bracket.validate(players).unwrap();
        }
    }

    #[test]
    fn test_bracket_identity_placement_double_byes() {
        let names: Vec<String> = (1..=17).map(|n| format!("P{}", n)).collect();
        let bracket = Bracket::new(
            &seed_players(&names, SeedingMode::Order),
            BracketOptions::default(),
        )
        .unwrap();

        let get = |round, index| bracket.get(MatchupId::new(round, index)).unwrap();

        // Seed k sits in slot k, everything behind seed 17 is a bye.
        assert_eq!(get(0, 0).entrants, [spot(0), spot(1)]);
        assert_eq!(get(0, 8).entrants, [winner(16), EntrantSpot::Bye]);
        assert_eq!(get(0, 9).entrants, [EntrantSpot::Bye, EntrantSpot::Bye]);
        assert!(get(0, 9).is_completed());

        // Seed 17 waits for a bye to be resolved.
        assert_eq!(get(1, 4).entrants, [spot(16), EntrantSpot::Bye]);
        assert!(get(1, 4).is_bye());
        assert!(!get(1, 4).is_completed());

        // Two byes meeting are completed and forwarded.
        assert_eq!(get(1, 5).entrants, [EntrantSpot::Bye, EntrantSpot::Bye]);
        assert!(get(1, 5).is_completed());
        assert_eq!(get(2, 3).entrants, [EntrantSpot::Bye, EntrantSpot::Bye]);
        assert!(get(2, 3).is_completed());
        assert_eq!(get(2, 2).entrants, [EntrantSpot::Bye, EntrantSpot::TBD]);
        assert_eq!(get(3, 1).entrants, [EntrantSpot::Bye, EntrantSpot::TBD]);
    }

    #[test]
    fn test_bracket_update_match() {
        let mut bracket =
            Bracket::new(&players!["A", "B", "C", "D"], BracketOptions::default()).unwrap();

        // The winner lands in the first TBD spot, regardless of which matchup finishes first.
        bracket
            .update_match(MatchupId::new(0, 1), |m, result| {
                m.set_winner(Side::Player2)?;
                result.winner(spot(3));
                Ok(())
            })
            .unwrap();

        assert_eq!(bracket.matchups()[2].entrants, [spot(3), EntrantSpot::TBD]);

        bracket
            .update_match(MatchupId::new(0, 0), |m, result| {
                m.set_winner(Side::Player1)?;
                result.winner(spot(0));
                Ok(())
            })
            .unwrap();

        assert_eq!(bracket.matchups()[2].entrants, [spot(3), spot(0)]);

        // A failing update never advances.
        let err = bracket
            .update_match(MatchupId::new(0, 0), |m, result| {
                result.winner(spot(1));
                m.set_winner(Side::Player2)
            })
            .unwrap_err();
        assert_eq!(err, Error::Completed(MatchupId::new(0, 0)));
        assert_eq!(bracket.matchups()[2].entrants, [spot(3), spot(0)]);

        assert_eq!(
            bracket
                .update_match(MatchupId::new(2, 0), |_, _| Ok(()))
                .unwrap_err(),
            Error::InvalidMatchup(MatchupId::new(2, 0))
        );
    }

    #[test]
    fn test_bracket_validate() {
        let bracket =
            Bracket::new(&players!["A", "B", "C", "D"], BracketOptions::default()).unwrap();

        bracket.validate(4).unwrap();
        assert_eq!(
            bracket.validate(5).unwrap_err(),
            Error::InvalidNumberOfMatches {
                expected: 7,
                found: 3
            }
        );
        assert_eq!(
            bracket.validate(3).unwrap_err(),
            Error::InvalidEntrant {
                index: 3,
                length: 3
            }
        );

        let mut broken = bracket.clone();
        broken.matchups[0].next = Some(1);
        assert_eq!(
            broken.validate(4).unwrap_err(),
            Error::InvalidLink { index: 0 }
        );
    }

    #[test]
    fn test_matchup_id() {
        let id = MatchupId::new(2, 13);
        assert_eq!(id.to_string(), "round-2-match-13");
        assert_eq!("round-2-match-13".parse::<MatchupId>().unwrap(), id);
        assert!("round-2-13".parse::<MatchupId>().is_err());
        assert!("round-x-match-1".parse::<MatchupId>().is_err());
    }
}
