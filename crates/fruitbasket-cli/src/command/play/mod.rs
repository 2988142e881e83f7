use std::path::PathBuf;

use crate::{
    command::{ModeArg, SessionArg, play::app::PlayApp},
    logging,
    tui::Tui,
};

mod app;
mod screens;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Save the game recording to a file when the session ends
    #[clap(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[clap(long, default_value = "./data/recordings/")]
    record_dir: PathBuf,
    /// Write logs to this file (the terminal is taken by the game)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        session,
        save_recording,
        record_dir,
        log_file,
    } = arg;

    if let Some(path) = log_file {
        logging::init_file(path)?;
    }

    let seed = session.seed();
    let mut app = match session.mode() {
        ModeArg::Basket => PlayApp::basket(session.basket_game(seed)?),
        ModeArg::Popup => PlayApp::popup(session.popup_game(seed)?),
    };

    Tui::new().run(&mut app)?;

    let score = app.score();
    if *save_recording {
        let path = app.into_history(seed).save(record_dir)?;
        eprintln!("Saved recording to {}", path.display());
    }
    eprintln!("Final score: {score} (seed {seed})");

    Ok(())
}
