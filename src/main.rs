mod args;
mod round;

use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

use crate::args::Args;
use crate::round::{run_round, RunOptions};

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    let options = RunOptions {
        out: args.out.clone(),
        reference: args.reference.clone(),
        emit_ballots: args.emit_ballots.clone(),
    };
    if let Err(e) = run_round(&args.config, &options) {
        eprintln!("An error occured:");
        for cause in ErrorCompat::iter_chain(&e) {
            eprintln!("  {}", cause);
        }
        std::process::exit(1);
    }
}
