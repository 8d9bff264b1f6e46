mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{allocate, classify, rate, reduce, run};

/// Map `-v` counts onto a log filter; `RUST_LOG` still wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Classify => classify::run(&cli),
        Commands::Allocate => allocate::run(&cli),
        Commands::Reduce(args) => reduce::run(&cli, args),
        Commands::Rate => rate::run(&cli),
        Commands::Run(args) => run::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
