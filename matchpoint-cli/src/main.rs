mod commands;
mod config;
mod render;
mod store;
mod utils;

use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;
use matchpoint_core::seeding::ValidationError;
use thiserror::Error;

use crate::commands::{App, Command};
use crate::config::{Config, ConfigError};
use crate::store::{Store, StoreError};

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to the config file [default: matchpoint.toml]
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Answer all confirmations with yes
    #[clap(short, long)]
    yes: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tournament(#[from] matchpoint_core::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("Need at least 2 players, found {0}. Run `matchpoint setup` first.")]
    NotEnoughPlayers(usize),
    #[error("Tournament is not complete yet!")]
    NotComplete,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = Config::load(args.config.as_deref())?.with_environment();
    init_logger(config.loglevel);

    log::debug!("Using config: {:?}", config);

    let store = Store::open(&config.store)?;

    let mut app = App::new(store, config, args.yes);
    args.command.run(&mut app)
}

/// Installs the logger at `level`. `RUST_LOG` overrides the level.
fn init_logger(level: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}
