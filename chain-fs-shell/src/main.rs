mod cli;
mod menu;


use std::io;
use std::process::ExitCode;

use chain_fs::ChainFileSystem;
use clap::Parser;
use typed_bytesize::ByteSizeIec;

use self::{cli::Cli, menu::Shell};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();

    let fs = match ChainFileSystem::format(&cli.partition, config) {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("Error formatting partition {:?}: {e}", cli.partition);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "partition={:?} size={} pool={}",
        cli.partition,
        ByteSizeIec(config.partition_size),
        ByteSizeIec(config.pool_bytes())
    );

    let shell = Shell::new(fs, io::stdin().lock(), io::stdout());
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("terminal I/O failure: {e}");
            ExitCode::FAILURE
        }
    }
}
