mod commands;
mod error;

use std::io;

use clap::error::ErrorKind;
use clap::Parser;
use log::LevelFilter;

use crate::commands::Args;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    let stdout = io::stdout();
    if let Err(error) = commands::run(&args, &mut stdout.lock()) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
