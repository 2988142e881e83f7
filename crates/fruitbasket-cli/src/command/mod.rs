use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fruitbasket_engine::{BasketGame, PopupGame, SpawnSeed};
use rand::Rng as _;

use crate::util;

use self::{config::ConfigArg, play::PlayArg, replay::ReplayArg, simulate::SimulateArg};

mod config;
mod play;
mod replay;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a random player headless and print the final state
    Simulate(#[clap(flatten)] SimulateArg),
    /// Re-run a saved recording and check its final score
    Replay(#[clap(flatten)] ReplayArg),
    /// Print the default configuration as JSON
    Config(#[clap(flatten)] ConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Config(arg) => config::run(&arg)?,
    }
    Ok(())
}

/// Game mode selectable on the command line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, derive_more::Display,
)]
pub enum ModeArg {
    /// Pick fruits and drop them into baskets
    #[default]
    #[display("basket")]
    Basket,
    /// Grab fruits popping up in a grid, on timers
    #[display("popup")]
    Popup,
}

/// Options shared by every command that builds a session.
#[derive(Default, Debug, Clone, clap::Args)]
pub struct SessionArg {
    /// Game mode
    #[clap(long, value_enum, default_value_t)]
    mode: ModeArg,
    /// Configuration file (JSON); missing fields take their default values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Spawn seed as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<SpawnSeed>,
}

impl SessionArg {
    pub fn mode(&self) -> ModeArg {
        self.mode
    }

    pub fn seed(&self) -> SpawnSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    pub fn basket_game(&self, seed: SpawnSeed) -> anyhow::Result<BasketGame> {
        let config = util::read_config(self.config.as_deref())?;
        BasketGame::with_seed(config, seed).context("Invalid basket-mode configuration")
    }

    pub fn popup_game(&self, seed: SpawnSeed) -> anyhow::Result<PopupGame> {
        let config = util::read_config(self.config.as_deref())?;
        PopupGame::with_seed(config, seed).context("Invalid pop-up configuration")
    }
}
