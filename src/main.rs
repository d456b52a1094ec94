mod cli;
mod config;
mod convert;
mod decompose_cmd;
mod extrema_cmd;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Decompose(args) => decompose_cmd::run(args),
        Command::Extrema(args) => extrema_cmd::run(args),
        Command::NumImfs(args) => {
            let m = sift_emd::try_num_imfs(args.len)?;
            println!("{m}");
            Ok(())
        }
    }
}
