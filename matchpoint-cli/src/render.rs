use std::fmt::Write;

use matchpoint_core::render::{BracketRounds, MatchupView, Renderer};
use matchpoint_core::structure::bracket_label;
use matchpoint_core::{BracketStructure, MatchState, Player, Side};

/// The number of seeds with a bye listed by name in the preview.
const PREVIEW_BYE_SEEDS: usize = 3;

/// Renders the bracket as plain text, one line per matchup.
#[derive(Debug, Default)]
pub struct TextRenderer {
    pub output: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn spot(view: &MatchupView<'_>, side: Side) -> String {
        let mut out = String::new();

        if view.is_winner(side) {
            out.push('*');
        }

        out.push_str(view.name(side));

        if let Some(player) = view.player(side) {
            let _ = write!(out, " ({})", player.seed);
        }

        if let Some(score) = view.score(side) {
            let _ = write!(out, " {}", score);
        }

        out
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, input: BracketRounds<'_>) {
        for round in input {
            let _ = writeln!(self.output, "{}", round.name());

            for view in round.matchups() {
                let state = match view.state() {
                    MatchState::Completed => "done",
                    MatchState::Bye => "bye",
                    MatchState::Waiting => "wait",
                    MatchState::Playable => "open",
                };

                let _ = writeln!(
                    self.output,
                    "  {:<18} [{}] {} vs {} ({})",
                    view.matchup().id().to_string(),
                    state,
                    Self::spot(&view, Side::Player1),
                    Self::spot(&view, Side::Player2),
                    view.matchup().scoring().mode(),
                );

                let sets = view.matchup().scoring().sets();
                for (index, set) in sets.iter().enumerate() {
                    let _ = writeln!(self.output, "      set {}: {}", index + 1, set);
                }
            }

            self.output.push('\n');
        }
    }
}

/// Describes the bracket the seed-sorted `players` would be placed into.
pub fn render_preview(players: &[Player]) -> String {
    let structure = BracketStructure::new(players.len());
    let mut out = String::new();

    let _ = writeln!(out, "Bracket: {}", bracket_label(players.len()));
    let _ = writeln!(
        out,
        "{} players, {} slots, {} rounds",
        players.len(),
        structure.slot_count,
        structure.total_rounds
    );
    let _ = writeln!(out, "First round: {} matches", structure.first_round_matches());

    if structure.has_byes() {
        let _ = writeln!(
            out,
            "{} BYE slot{} allocated, top {} seed{} receive BYE advantages",
            structure.bye_count,
            plural(structure.bye_count),
            structure.bye_count,
            plural(structure.bye_count),
        );

        for player in players.iter().take(structure.bye_count.min(PREVIEW_BYE_SEEDS)) {
            let _ = writeln!(
                out,
                "  {} (Seed {}) gets BYE to round 2",
                player.name, player.seed
            );
        }

        if structure.bye_count > PREVIEW_BYE_SEEDS {
            let rest = structure.bye_count - PREVIEW_BYE_SEEDS;
            let _ = writeln!(out, "  ... and {} more seed{}", rest, plural(rest));
        }
    }

    let _ = writeln!(out, "Seeds:");
    for player in players {
        let _ = writeln!(out, "  #{:<3} {}", player.seed, player.name);
    }

    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
