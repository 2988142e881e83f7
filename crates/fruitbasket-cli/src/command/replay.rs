use std::path::PathBuf;

use anyhow::Context as _;
use fruitbasket_engine::{BasketGame, GameMode, PopupGame, SessionEngine, SpawnSeed};

use crate::{
    logging,
    schema::record::{RecordedGame, RecordedSession},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the recording file (JSON format)
    recording_file: PathBuf,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg { recording_file } = arg;
    logging::init_stderr();

    tracing::info!(path = %recording_file.display(), "loading recording");
    let session: RecordedSession = util::read_json_file("recording", recording_file)?;
    tracing::info!(
        mode = session.game.mode_name(),
        seed = %session.seed,
        events = session.game.event_count(),
        recorded_at = %session.recorded_at,
        "recording loaded"
    );

    let score = replay_score(session.game, session.seed)?;
    println!(
        "{}: recorded score {}, replayed score {}",
        recording_file.display(),
        session.final_score,
        score
    );
    anyhow::ensure!(
        score == session.final_score,
        "Replay diverged from the recording"
    );
    Ok(())
}

fn replay_score(game: RecordedGame, seed: SpawnSeed) -> anyhow::Result<u64> {
    let score = match game {
        RecordedGame::Basket { config, events } => {
            let game = BasketGame::with_seed(config, seed)
                .context("Recording has an invalid basket-mode configuration")?;
            replay(game, events).snapshot().score()
        }
        RecordedGame::Popup { config, events } => {
            let game = PopupGame::with_seed(config, seed)
                .context("Recording has an invalid pop-up configuration")?;
            replay(game, events).snapshot().score()
        }
    };
    Ok(score)
}

fn replay<M>(mode: M, events: Vec<M::Event>) -> SessionEngine<M>
where
    M: GameMode,
{
    let mut engine = SessionEngine::new(mode);
    for event in events {
        engine.submit(event);
    }
    engine
}
