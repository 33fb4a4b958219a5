use std::collections::VecDeque;

use chrono::Utc;
use clap::Subcommand;
use matchpoint_core::results::TournamentResult;
use matchpoint_core::seeding::{validate_players, validate_seeding};
use matchpoint_core::{seed_players, MatchupId, ScoringMode, SeedingMode, Session, Side, Tournament};

use crate::config::Config;
use crate::render::{render_preview, TextRenderer};
use crate::store::{self, Store};
use crate::utils::Terminal;
use crate::Error;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enter the players, replacing the current tournament
    Setup {
        /// How seeds are assigned: 'order' or 'manual' ("Name #3")
        #[clap(short, long, default_value = "order")]
        seeding: SeedingMode,
        #[clap(required = true)]
        players: Vec<String>,
    },
    /// Show the seeded players and the bracket shape
    Preview,
    /// Show the bracket
    Show,
    /// Pick the winner of a basic matchup
    Win { matchup: MatchupId, side: Side },
    /// Advance the player of a bye matchup
    Bye { matchup: MatchupId },
    /// Clear the winner of a matchup
    Reopen { matchup: MatchupId },
    /// Switch the scoring mode of a matchup: 'basic', 'points' or 'sets'
    Mode {
        matchup: MatchupId,
        mode: ScoringMode,
    },
    /// Add or remove points
    Points {
        matchup: MatchupId,
        side: Side,
        #[clap(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Add a new set
    AddSet { matchup: MatchupId },
    /// Enter the scores of a set
    EditSet {
        matchup: MatchupId,
        /// The 1-based set number
        set: usize,
        player1: Option<u32>,
        player2: Option<u32>,
    },
    /// Declare the player with the higher score as the winner
    Complete { matchup: MatchupId },
    /// Throw away all progress
    Reset,
    /// Show the result of the finished tournament
    Winner,
    /// List recently finished tournaments
    History,
}

impl Command {
    pub fn run(self, app: &mut App) -> Result<(), Error> {
        match self {
            Self::Setup { seeding, players } => app.setup(players, seeding),
            Self::Preview => app.preview(),
            Self::Show => {
                let tournament = app.load()?;
                print!("{}", app.render(&tournament));
                Ok(())
            }
            Self::Win { matchup, side } => {
                app.update(|t, terminal| Session::new(t, terminal).set_winner_basic(matchup, side))
            }
            Self::Bye { matchup } => app.update(|t, _| t.complete_bye(matchup)),
            Self::Reopen { matchup } => {
                app.update(|t, terminal| Session::new(t, terminal).reopen_match(matchup))
            }
            Self::Mode { matchup, mode } => app.update(|t, _| t.set_scoring_mode(matchup, mode)),
            Self::Points {
                matchup,
                side,
                delta,
            } => app.update(|t, _| t.change_points(matchup, side, delta)),
            Self::AddSet { matchup } => app.update(|t, _| t.add_set(matchup)),
            Self::EditSet {
                matchup,
                set,
                player1,
                player2,
            } => {
                app.scores.extend(player1.into_iter().chain(player2));

                // Set 0 wraps around and is rejected as an invalid set.
                let index = set.wrapping_sub(1);
                app.update(|t, terminal| Session::new(t, terminal).edit_set(matchup, index))
            }
            Self::Complete { matchup } => {
                app.update(|t, terminal| Session::new(t, terminal).complete_match(matchup))
            }
            Self::Reset => app.update(|t, terminal| Session::new(t, terminal).reset()),
            Self::Winner => app.winner(),
            Self::History => app.history(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub store: Store,
    pub config: Config,
    pub assume_yes: bool,
    /// Preset answers for score prompts.
    pub scores: VecDeque<u32>,
}

impl App {
    pub fn new(store: Store, config: Config, assume_yes: bool) -> Self {
        Self {
            store,
            config,
            assume_yes,
            scores: VecDeque::new(),
        }
    }

    fn setup(&mut self, players: Vec<String>, seeding: SeedingMode) -> Result<(), Error> {
        validate_players(&players)?;
        validate_seeding(&players, seeding)?;

        self.store.set(store::PLAYERS, &players)?;
        self.store.set(store::SEEDING, &seeding)?;
        self.store.remove(store::STATE);
        self.store.remove(store::WINNER);
        self.store.save()?;

        log::info!("Saved {} players using {} seeding", players.len(), seeding);

        self.preview()
    }

    fn preview(&self) -> Result<(), Error> {
        let names: Vec<String> = self.store.get(store::PLAYERS)?.unwrap_or_default();
        let seeding = self.store.get(store::SEEDING)?.unwrap_or_default();
        let players = seed_players(&names, seeding);

        if players.len() < 2 {
            return Err(Error::NotEnoughPlayers(players.len()));
        }

        print!("{}", render_preview(&players));
        Ok(())
    }

    /// Loads the saved tournament or creates a new one from the stored players.
    pub fn load(&self) -> Result<Tournament, Error> {
        if let Some(tournament) = self.store.get::<Tournament>(store::STATE)? {
            tournament.validate()?;
            return Ok(tournament);
        }

        let names: Vec<String> = self.store.get(store::PLAYERS)?.unwrap_or_default();
        let seeding = self.store.get(store::SEEDING)?.unwrap_or_default();

        match Tournament::new(seed_players(&names, seeding), self.config.bracket) {
            Ok(tournament) => Ok(tournament),
            Err(matchpoint_core::Error::NotEnoughPlayers { found }) => {
                Err(Error::NotEnoughPlayers(found))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn render(&self, tournament: &Tournament) -> String {
        let mut renderer = TextRenderer::new();
        tournament.render(&mut renderer);
        renderer.output
    }

    /// Applies `f` to the tournament and saves it. A completed championship stores the result
    /// and adds it to the history.
    fn update<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Tournament, &mut Terminal) -> matchpoint_core::Result<()>,
    {
        let mut tournament = self.load()?;
        let was_complete = tournament.is_complete();

        let mut terminal = Terminal {
            assume_yes: self.assume_yes,
            scores: std::mem::take(&mut self.scores),
        };

        match f(&mut tournament, &mut terminal) {
            Ok(()) => (),
            Err(matchpoint_core::Error::Cancelled) => {
                println!("Cancelled");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        self.store.set(store::STATE, &tournament)?;

        if !was_complete {
            if let Some(result) = tournament.result() {
                self.finish(result)?;
            }
        }

        self.store.save()?;

        print!("{}", self.render(&tournament));
        Ok(())
    }

    fn finish(&mut self, result: TournamentResult) -> Result<(), Error> {
        log::info!("Tournament won by {}", result.winner.name);
        println!(
            "Tournament winner: {} (Final Score: {})",
            result.winner.name, result.final_score
        );

        self.store.set(store::WINNER, &result)?;
        self.store
            .push_history(result, self.config.history_limit, Utc::now())?;

        Ok(())
    }

    fn winner(&self) -> Result<(), Error> {
        let result: TournamentResult = self
            .store
            .get(store::WINNER)?
            .ok_or(Error::NotComplete)?;

        println!("Champion: {} (seed {})", result.winner.name, result.winner.seed);
        if let Some(runner_up) = &result.runner_up {
            println!("Runner-up: {} (seed {})", runner_up.name, runner_up.seed);
        }
        println!("Final Score: {}", result.final_score);
        println!("Date: {}", result.win_date.format("%Y-%m-%d %H:%M"));
        println!(
            "{} players, {} rounds, {} byes",
            result.total_players, result.total_rounds, result.structure.bye_count
        );

        for report in &result.match_results {
            println!(
                "  {:<16} {} ({}) def. {} {}",
                report.round_name,
                report.winner,
                report.winner_seed,
                report.loser,
                report.score
            );
        }

        Ok(())
    }

    fn history(&self) -> Result<(), Error> {
        let history = self.store.history()?;
        if history.is_empty() {
            println!("No finished tournaments");
        }

        for entry in history {
            let runner_up = entry
                .result
                .runner_up
                .as_ref()
                .map(|player| player.name.as_str())
                .unwrap_or("BYE");

            println!(
                "{}  {} def. {}  {}  ({} players)",
                entry.saved_at.format("%Y-%m-%d %H:%M"),
                entry.result.winner.name,
                runner_up,
                entry.result.final_score,
                entry.result.total_players
            );
        }

        Ok(())
    }
}
