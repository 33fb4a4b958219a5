use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::{EntrantSpot, Error, MatchupId, Node, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two spots of a [`Matchup`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }

    /// Returns the `Side` for the spot at `index`. Any index other than 0 is [`Side::Player2`].
    #[inline]
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::Player1
        } else {
            Self::Player2
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => f.write_str("player1"),
            Self::Player2 => f.write_str("player2"),
        }
    }
}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1" | "player1" => Ok(Self::Player1),
            "2" | "player2" => Ok(Self::Player2),
            _ => Err(ParseSideError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid side '{0}': expected 'player1' or 'player2'")]
pub struct ParseSideError(String);

/// The scores of a single set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetScore {
    pub player1: u32,
    pub player2: u32,
}

impl SetScore {
    #[inline]
    pub fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }

    /// Returns the side that strictly won this set.
    pub fn winner(&self) -> Option<Side> {
        if self.player1 > self.player2 {
            Some(Side::Player1)
        } else if self.player2 > self.player1 {
            Some(Side::Player2)
        } else {
            None
        }
    }
}

impl Display for SetScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.player1, self.player2)
    }
}

/// The way a matchup is scored, without any of the scores.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScoringMode {
    /// The winner is picked directly.
    #[default]
    Basic,
    Points,
    Sets,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Points => "points",
            Self::Sets => "sets",
        }
    }
}

impl Display for ScoringMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = ParseScoringModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "points" => Ok(Self::Points),
            "sets" => Ok(Self::Sets),
            _ => Err(ParseScoringModeError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid scoring mode '{0}': expected 'basic', 'points' or 'sets'")]
pub struct ParseScoringModeError(String);

/// The scoring of a matchup together with the scores recorded so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum Scoring {
    #[default]
    Basic,
    Points {
        points: [u32; 2],
    },
    Sets {
        sets: Vec<SetScore>,
        /// The number of sets each side strictly won.
        won: [u32; 2],
    },
}

impl Scoring {
    /// Creates an empty `Scoring` for `mode`.
    pub fn new(mode: ScoringMode) -> Self {
        match mode {
            ScoringMode::Basic => Self::Basic,
            ScoringMode::Points => Self::Points { points: [0, 0] },
            ScoringMode::Sets => Self::Sets {
                sets: Vec::new(),
                won: [0, 0],
            },
        }
    }

    pub fn mode(&self) -> ScoringMode {
        match self {
            Self::Basic => ScoringMode::Basic,
            Self::Points { .. } => ScoringMode::Points,
            Self::Sets { .. } => ScoringMode::Sets,
        }
    }

    /// Returns the points in points scoring or the sets won in sets scoring.
    pub fn score(&self) -> Option<[u32; 2]> {
        match self {
            Self::Basic => None,
            Self::Points { points } => Some(*points),
            Self::Sets { won, .. } => Some(*won),
        }
    }

    /// Returns the list of sets. Empty for every mode other than sets.
    pub fn sets(&self) -> &[SetScore] {
        match self {
            Self::Sets { sets, .. } => sets,
            _ => &[],
        }
    }

    /// Clears the score of a player that was freshly placed into `side`.
    pub(crate) fn reset_side(&mut self, side: Side) {
        match self {
            Self::Basic => (),
            Self::Points { points } => points[side.index()] = 0,
            Self::Sets { won, .. } => won[side.index()] = 0,
        }
    }
}

/// How a [`Matchup`] should be presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchState {
    Completed,
    /// A bye match that has not been resolved yet.
    Bye,
    /// At least one spot still waits for the winner of a previous matchup.
    Waiting,
    Playable,
}

/// A matchup of two [`EntrantSpot`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matchup {
    pub(crate) id: MatchupId,
    pub(crate) entrants: [EntrantSpot<Node>; 2],
    pub(crate) scoring: Scoring,
    pub(crate) completed: bool,
    /// The index of the matchup the winner advances to. `None` for the championship.
    pub(crate) next: Option<usize>,
    pub(crate) is_bye: bool,
}

impl Matchup {
    /// Creates a new pending `Matchup`. A matchup containing a bye and no TBD spot is completed
    /// right away, the other side being the winner.
    pub(crate) fn new(id: MatchupId, entrants: [EntrantSpot<Node>; 2], next: Option<usize>) -> Self {
        let mut this = Self {
            id,
            entrants,
            scoring: Scoring::Basic,
            completed: false,
            next,
            is_bye: entrants.iter().any(EntrantSpot::is_bye),
        };

        if this.is_bye && !entrants.iter().any(EntrantSpot::is_tbd) {
            this.resolve_bye();
        }

        this
    }

    #[inline]
    pub fn id(&self) -> MatchupId {
        self.id
    }

    #[inline]
    pub fn entrants(&self) -> &[EntrantSpot<Node>; 2] {
        &self.entrants
    }

    #[inline]
    pub fn entrant(&self, side: Side) -> &EntrantSpot<Node> {
        &self.entrants[side.index()]
    }

    #[inline]
    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[inline]
    pub fn is_bye(&self) -> bool {
        self.is_bye
    }

    /// Returns the index of the matchup the winner advances to.
    #[inline]
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    pub fn state(&self) -> MatchState {
        if self.completed {
            MatchState::Completed
        } else if self.is_bye {
            MatchState::Bye
        } else if self.entrants.iter().any(EntrantSpot::is_tbd) {
            MatchState::Waiting
        } else {
            MatchState::Playable
        }
    }

    /// Returns the side whose winner flag is set.
    pub fn winner(&self) -> Option<Side> {
        self.entrants
            .iter()
            .position(|spot| matches!(spot, EntrantSpot::Entrant(node) if node.winner))
            .map(Side::from_index)
    }

    /// Returns the spot that advances into the next matchup. This is the winner of a completed
    /// matchup, or a bye if a completed matchup consisted of two byes.
    pub(crate) fn advancing(&self) -> Option<EntrantSpot<Node>> {
        if !self.completed {
            return None;
        }

        match self.winner() {
            Some(side) => Some(self.entrant(side).map(|node| Node::new(node.index()))),
            None if self.entrants.iter().all(EntrantSpot::is_bye) => Some(EntrantSpot::Bye),
            None => None,
        }
    }

    /// Picks `side` as the winner of a basic matchup.
    pub(crate) fn set_winner(&mut self, side: Side) -> Result<()> {
        self.ensure_playable()?;
        self.complete(side);
        Ok(())
    }

    /// Advances the non-bye side of a bye match.
    pub(crate) fn complete_bye(&mut self) -> Result<()> {
        if !self.is_bye {
            return Err(Error::NotByeMatch(self.id));
        }

        if self.completed {
            return Err(Error::Completed(self.id));
        }

        if self.entrants.iter().any(EntrantSpot::is_tbd) {
            return Err(Error::NotPlayable(self.id));
        }

        self.resolve_bye();
        Ok(())
    }

    fn resolve_bye(&mut self) {
        for spot in self.entrants.iter_mut() {
            if let EntrantSpot::Entrant(node) = spot {
                node.winner = true;
            }
        }

        self.completed = true;
    }

    /// Clears the winner. Matchups the winner already advanced to are left untouched.
    pub(crate) fn reopen(&mut self) {
        for spot in self.entrants.iter_mut() {
            if let EntrantSpot::Entrant(node) = spot {
                node.winner = false;
            }
        }

        self.completed = false;
    }

    pub(crate) fn change_points(&mut self, side: Side, delta: i64) -> Result<()> {
        self.ensure_playable()?;

        let id = self.id;
        let found = self.scoring.mode();
        match &mut self.scoring {
            Scoring::Points { points } => {
                let value = i64::from(points[side.index()])
                    .checked_add(delta)
                    .ok_or(Error::PointsOverflow)?;
                if value < 0 {
                    return Err(Error::NegativePoints);
                }

                points[side.index()] = u32::try_from(value).map_err(|_| Error::PointsOverflow)?;
                Ok(())
            }
            _ => Err(Error::ScoringMode {
                id,
                expected: ScoringMode::Points,
                found,
            }),
        }
    }

    pub(crate) fn add_set(&mut self) -> Result<()> {
        self.ensure_playable()?;

        let id = self.id;
        let found = self.scoring.mode();
        match &mut self.scoring {
            Scoring::Sets { sets, .. } => {
                sets.push(SetScore::default());
                Ok(())
            }
            _ => Err(Error::ScoringMode {
                id,
                expected: ScoringMode::Sets,
                found,
            }),
        }
    }

    /// Overwrites the set at `index` and recounts the sets won by both sides.
    pub(crate) fn edit_set(&mut self, index: usize, score: SetScore) -> Result<()> {
        self.ensure_playable()?;

        let id = self.id;
        let found = self.scoring.mode();
        match &mut self.scoring {
            Scoring::Sets { sets, won } => {
                let length = sets.len();
                let set = sets
                    .get_mut(index)
                    .ok_or(Error::InvalidSet { index, length })?;
                *set = score;

                *won = [0, 0];
                for winner in sets.iter().filter_map(SetScore::winner) {
                    won[winner.index()] += 1;
                }

                Ok(())
            }
            _ => Err(Error::ScoringMode {
                id,
                expected: ScoringMode::Sets,
                found,
            }),
        }
    }

    /// Switches to `mode`, discarding all scores recorded so far.
    pub(crate) fn set_scoring_mode(&mut self, mode: ScoringMode) -> Result<()> {
        self.ensure_playable()?;
        self.scoring = Scoring::new(mode);
        Ok(())
    }

    /// Returns the side with the strictly higher score.
    pub(crate) fn decide(&self) -> Result<Side> {
        self.ensure_playable()?;

        let [first, second] = self.scoring.score().ok_or(Error::Unscored(self.id))?;
        if first > second {
            Ok(Side::Player1)
        } else if second > first {
            Ok(Side::Player2)
        } else {
            Err(Error::Tied)
        }
    }

    /// Completes a points or sets matchup using the recorded scores.
    pub(crate) fn complete_match(&mut self) -> Result<Side> {
        let side = self.decide()?;
        self.complete(side);
        Ok(side)
    }

    fn complete(&mut self, side: Side) {
        for (index, spot) in self.entrants.iter_mut().enumerate() {
            if let EntrantSpot::Entrant(node) = spot {
                node.winner = index == side.index();
            }
        }

        self.completed = true;
    }

    /// Checks that the matchup is pending, not a bye and has both entrants.
    pub(crate) fn ensure_playable(&self) -> Result<()> {
        match self.state() {
            MatchState::Completed => Err(Error::Completed(self.id)),
            MatchState::Bye => Err(Error::ByeMatch(self.id)),
            MatchState::Waiting => Err(Error::NotPlayable(self.id)),
            MatchState::Playable => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup() -> Matchup {
        Matchup::new(
            MatchupId::new(0, 0),
            [
                EntrantSpot::Entrant(Node::new(0)),
                EntrantSpot::Entrant(Node::new(1)),
            ],
            None,
        )
    }

    #[test]
    fn test_matchup_new_bye() {
        let m = Matchup::new(
            MatchupId::new(0, 1),
            [EntrantSpot::Bye, EntrantSpot::Entrant(Node::new(3))],
            Some(4),
        );

        assert!(m.is_bye());
        assert!(m.is_completed());
        assert_eq!(m.winner(), Some(Side::Player2));
        assert_eq!(m.advancing(), Some(EntrantSpot::Entrant(Node::new(3))));

        let m = Matchup::new(
            MatchupId::new(0, 1),
            [EntrantSpot::Bye, EntrantSpot::Bye],
            Some(4),
        );

        assert!(m.is_completed());
        assert_eq!(m.winner(), None);
        assert_eq!(m.advancing(), Some(EntrantSpot::Bye));
    }

    #[test]
    fn test_matchup_set_winner() {
        let mut m = matchup();
        assert_eq!(m.state(), MatchState::Playable);
        assert_eq!(m.advancing(), None);

        m.set_winner(Side::Player2).unwrap();

        assert!(m.is_completed());
        assert_eq!(m.winner(), Some(Side::Player2));
        assert_eq!(m.advancing(), Some(EntrantSpot::Entrant(Node::new(1))));
        assert_eq!(
            m.set_winner(Side::Player1),
            Err(Error::Completed(MatchupId::new(0, 0)))
        );
        assert_eq!(m.winner(), Some(Side::Player2));
    }

    #[test]
    fn test_matchup_not_playable() {
        let mut m = Matchup::new(
            MatchupId::new(1, 0),
            [EntrantSpot::Entrant(Node::new(0)), EntrantSpot::TBD],
            None,
        );

        assert_eq!(m.state(), MatchState::Waiting);
        assert_eq!(
            m.set_winner(Side::Player1),
            Err(Error::NotPlayable(MatchupId::new(1, 0)))
        );
        assert_eq!(
            m.set_scoring_mode(ScoringMode::Points),
            Err(Error::NotPlayable(MatchupId::new(1, 0)))
        );

        let mut m = Matchup::new(
            MatchupId::new(0, 0),
            [EntrantSpot::Entrant(Node::new(0)), EntrantSpot::Bye],
            None,
        );
        m.reopen();

        assert_eq!(m.state(), MatchState::Bye);
        assert_eq!(
            m.set_winner(Side::Player1),
            Err(Error::ByeMatch(MatchupId::new(0, 0)))
        );
    }

    #[test]
    fn test_matchup_complete_bye() {
        let mut m = matchup();
        assert_eq!(
            m.complete_bye(),
            Err(Error::NotByeMatch(MatchupId::new(0, 0)))
        );

        let mut m = Matchup::new(
            MatchupId::new(1, 0),
            [EntrantSpot::Bye, EntrantSpot::TBD],
            None,
        );
        assert_eq!(m.state(), MatchState::Bye);
        assert!(!m.is_completed());
        assert_eq!(m.winner(), None);
        assert_eq!(
            m.complete_bye(),
            Err(Error::NotPlayable(MatchupId::new(1, 0)))
        );

        m.entrants[1] = EntrantSpot::Entrant(Node::new(2));
        m.complete_bye().unwrap();
        assert!(m.is_completed());
        assert_eq!(m.winner(), Some(Side::Player2));
        assert_eq!(
            m.complete_bye(),
            Err(Error::Completed(MatchupId::new(1, 0)))
        );
    }

    #[test]
    fn test_matchup_reopen() {
        let mut m = matchup();
        m.set_winner(Side::Player1).unwrap();
        m.reopen();

        assert!(!m.is_completed());
        assert_eq!(m.winner(), None);
        assert_eq!(m.state(), MatchState::Playable);
    }

    #[test]
    fn test_matchup_points() {
        let mut m = matchup();
        assert_eq!(
            m.change_points(Side::Player1, 1),
            Err(Error::ScoringMode {
                id: MatchupId::new(0, 0),
                expected: ScoringMode::Points,
                found: ScoringMode::Basic,
            })
        );
        assert_eq!(m.decide(), Err(Error::Unscored(MatchupId::new(0, 0))));

        m.set_scoring_mode(ScoringMode::Points).unwrap();
        assert_eq!(
            m.change_points(Side::Player1, -1),
            Err(Error::NegativePoints)
        );

        for _ in 0..3 {
            m.change_points(Side::Player1, 1).unwrap();
            m.change_points(Side::Player2, 1).unwrap();
        }
        assert_eq!(m.scoring(), &Scoring::Points { points: [3, 3] });

        assert_eq!(m.complete_match(), Err(Error::Tied));
        assert!(!m.is_completed());

        m.change_points(Side::Player2, -1).unwrap();
        assert_eq!(m.complete_match(), Ok(Side::Player1));
        assert!(m.is_completed());
        assert_eq!(m.winner(), Some(Side::Player1));
    }

    #[test]
    fn test_matchup_points_overflow() {
        let mut m = matchup();
        m.set_scoring_mode(ScoringMode::Points).unwrap();
        m.change_points(Side::Player1, 1).unwrap();

        assert_eq!(
            m.change_points(Side::Player1, i64::MAX),
            Err(Error::PointsOverflow)
        );
        assert_eq!(
            m.change_points(Side::Player1, i64::from(u32::MAX)),
            Err(Error::PointsOverflow)
        );
        assert_eq!(m.scoring(), &Scoring::Points { points: [1, 0] });

        m.change_points(Side::Player1, i64::from(u32::MAX) - 1).unwrap();
        assert_eq!(m.scoring(), &Scoring::Points { points: [u32::MAX, 0] });
        assert_eq!(
            m.change_points(Side::Player1, i64::MIN),
            Err(Error::NegativePoints)
        );
    }

    #[test]
    fn test_matchup_sets() {
        let mut m = matchup();
        m.set_scoring_mode(ScoringMode::Sets).unwrap();

        assert_eq!(
            m.edit_set(0, SetScore::new(6, 4)),
            Err(Error::InvalidSet {
                index: 0,
                length: 0
            })
        );

        m.add_set().unwrap();
        m.add_set().unwrap();
        m.add_set().unwrap();
        assert_eq!(m.scoring().sets(), &[SetScore::default(); 3]);

        m.edit_set(0, SetScore::new(6, 4)).unwrap();
        m.edit_set(1, SetScore::new(3, 6)).unwrap();
        m.edit_set(2, SetScore::new(5, 5)).unwrap();
        assert_eq!(m.scoring().score(), Some([1, 1]));
        assert_eq!(m.complete_match(), Err(Error::Tied));

        m.edit_set(2, SetScore::new(7, 5)).unwrap();
        assert_eq!(m.scoring().score(), Some([2, 1]));

        // Overwriting a set recounts from scratch.
        m.edit_set(0, SetScore::new(1, 6)).unwrap();
        assert_eq!(m.scoring().score(), Some([1, 2]));

        assert_eq!(m.complete_match(), Ok(Side::Player2));
        assert_eq!(m.add_set(), Err(Error::Completed(MatchupId::new(0, 0))));
    }

    #[test]
    fn test_matchup_switch_scoring_mode() {
        let mut m = matchup();
        m.set_scoring_mode(ScoringMode::Points).unwrap();
        m.change_points(Side::Player1, 5).unwrap();

        m.set_scoring_mode(ScoringMode::Points).unwrap();
        assert_eq!(m.scoring(), &Scoring::Points { points: [0, 0] });

        m.set_scoring_mode(ScoringMode::Sets).unwrap();
        m.add_set().unwrap();
        m.set_scoring_mode(ScoringMode::Sets).unwrap();
        assert_eq!(
            m.scoring(),
            &Scoring::Sets {
                sets: vec![],
                won: [0, 0]
            }
        );
    }

    #[test]
    fn test_scoring_reset_side() {
        let mut scoring = Scoring::Points { points: [4, 2] };
        scoring.reset_side(Side::Player2);
        assert_eq!(scoring, Scoring::Points { points: [4, 0] });

        let mut scoring = Scoring::Sets {
            sets: vec![SetScore::new(6, 1)],
            won: [1, 0],
        };
        scoring.reset_side(Side::Player1);
        assert_eq!(scoring.score(), Some([0, 0]));
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("1".parse::<Side>().unwrap(), Side::Player1);
        assert_eq!("player2".parse::<Side>().unwrap(), Side::Player2);
        assert!("3".parse::<Side>().is_err());
        assert_eq!(Side::Player1.other(), Side::Player2);
    }
}
