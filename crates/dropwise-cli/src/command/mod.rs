use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use self::{auto_play::AutoPlayArg, train::TrainArg};

mod auto_play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play games with a fixed weight vector
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Tune the weights with an evolutionary search over self-played games
    Train(#[clap(flatten)] TrainArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match &args.mode {
        Mode::AutoPlay(arg) => auto_play::run(arg)?,
        Mode::Train(arg) => train::run(arg)?,
    }
    Ok(())
}

/// `RUST_LOG` wins over `-v`; without either only `info` and above is shown.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
