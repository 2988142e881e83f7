use std::path::PathBuf;

use fruitbasket_engine::{PopupConfig, SessionConfig};

use crate::{command::ModeArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Game mode whose configuration to print
    #[clap(long, value_enum, default_value_t)]
    mode: ModeArg,
    /// Output file (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConfigArg) -> anyhow::Result<()> {
    let ConfigArg { mode, output } = arg;
    match mode {
        ModeArg::Basket => Output::save_json(&SessionConfig::default(), output.clone()),
        ModeArg::Popup => Output::save_json(&PopupConfig::default(), output.clone()),
    }
}
