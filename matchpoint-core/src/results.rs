//! Reports about finished matchups and the final tournament result.
use chrono::{DateTime, Utc};

use crate::{
    BracketStructure, Matchup, MatchupId, Player, Scoring, ScoringMode, SetScore, Side, Tournament,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returns the display name of the 0-based `round` in a bracket with `total_rounds` rounds.
///
/// Rounds are named by their distance from the championship. Early rounds are named after the
/// number of players left in them, falling back to their position if that number exceeds
/// `total_players`.
pub fn round_name(round: usize, total_rounds: usize, total_players: usize) -> String {
    let rounds_from_end = total_rounds.saturating_sub(round);

    match rounds_from_end {
        1 => String::from("Championship"),
        2 => String::from("Semi-Finals"),
        3 => String::from("Quarter-Finals"),
        n => match 1usize.checked_shl(n as u32) {
            Some(players) if players <= total_players => format!("Round of {}", players),
            _ => format!("Round {}", round + 1),
        },
    }
}

/// Returns the score of a matchup as shown in the match results.
///
/// Basic matchups record no score and always return `"1-0"`.
pub fn match_score(matchup: &Matchup) -> String {
    if matchup.is_bye() {
        return String::from("BYE");
    }

    match matchup.scoring().score() {
        Some([first, second]) => format!("{}-{}", first, second),
        None => String::from("1-0"),
    }
}

/// Returns the score of the championship matchup as shown in the tournament result.
pub fn final_score(scoring: &Scoring) -> String {
    match scoring {
        Scoring::Basic => String::from("N/A"),
        Scoring::Points { points } => format!("{}-{}", points[0], points[1]),
        Scoring::Sets { sets, won } => {
            let mut score = format!("{}-{}", won[0], won[1]);

            if !sets.is_empty() {
                let sets: Vec<String> = sets.iter().map(SetScore::to_string).collect();
                score.push_str(&format!(" (Sets: {})", sets.join(", ")));
            }

            score
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayerSummary {
    pub name: String,
    pub seed: u32,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            seed: player.seed,
        }
    }
}

/// The outcome of a single completed matchup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchReport {
    /// The 1-based round.
    pub round: usize,
    pub round_name: String,
    pub matchup: MatchupId,
    pub winner: String,
    pub winner_seed: u32,
    /// The name of the loser, or `"BYE"`.
    pub loser: String,
    pub loser_seed: Option<u32>,
    pub score: String,
    pub is_bye: bool,
}

/// Returns a report for every completed matchup that has a winner, round by round.
pub fn match_reports(tournament: &Tournament) -> Vec<MatchReport> {
    let bracket = tournament.bracket();
    let total_rounds = bracket.total_rounds();
    let total_players = tournament.players().len();

    bracket
        .matchups()
        .iter()
        .filter(|m| m.is_completed())
        .filter_map(|m| {
            let side = m.winner()?;
            let winner = tournament.player(m.entrant(side))?;
            let loser = m.entrant(side.other());

            Some(MatchReport {
                round: m.id().round + 1,
                round_name: round_name(m.id().round, total_rounds, total_players),
                matchup: m.id(),
                winner: winner.name.clone(),
                winner_seed: winner.seed,
                loser: tournament.name(loser).to_owned(),
                loser_seed: tournament.player(loser).map(|player| player.seed),
                score: match_score(m),
                is_bye: m.is_bye(),
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChampionshipMatch {
    pub player1: String,
    pub player2: String,
    pub scoring_mode: ScoringMode,
    pub sets: Vec<SetScore>,
}

/// The record handed out once the championship is decided.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentResult {
    pub winner: PlayerSummary,
    /// `None` if the champion advanced through a bye in the championship.
    pub runner_up: Option<PlayerSummary>,
    pub final_score: String,
    pub scoring_mode: ScoringMode,
    pub championship: ChampionshipMatch,
    pub win_date: DateTime<Utc>,
    pub total_rounds: usize,
    pub total_players: usize,
    pub all_players: Vec<PlayerSummary>,
    pub match_results: Vec<MatchReport>,
    pub structure: BracketStructure,
}

impl TournamentResult {
    /// Creates the result of `tournament`. Returns `None` if the championship has no winner yet.
    pub fn new(tournament: &Tournament, win_date: DateTime<Utc>) -> Option<Self> {
        let championship = tournament.bracket().final_matchup()?;
        if !championship.is_completed() {
            return None;
        }

        let side = championship.winner()?;
        let winner = tournament.player(championship.entrant(side))?;
        let runner_up = tournament.player(championship.entrant(side.other()));

        Some(Self {
            winner: winner.into(),
            runner_up: runner_up.map(PlayerSummary::from),
            final_score: final_score(championship.scoring()),
            scoring_mode: championship.scoring().mode(),
            championship: ChampionshipMatch {
                player1: tournament.name(championship.entrant(Side::Player1)).to_owned(),
                player2: tournament.name(championship.entrant(Side::Player2)).to_owned(),
                scoring_mode: championship.scoring().mode(),
                sets: championship.scoring().sets().to_vec(),
            },
            win_date,
            total_rounds: tournament.bracket().total_rounds(),
            total_players: tournament.players().len(),
            all_players: tournament.players().iter().map(PlayerSummary::from).collect(),
            match_results: match_reports(tournament),
            structure: tournament.structure(),
        })
    }
}
