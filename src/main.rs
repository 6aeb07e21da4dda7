use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cadence::cli::args::{Cli, Commands};
use cadence::cli::commands;
use cadence::config::Config;
use cadence::focus::FocusStorage;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let format = cli.output;
    let user = cli.user.unwrap_or_else(|| config.general.user.clone());

    let output = match cli.command {
        Commands::Expand(args) => commands::expand(&args, format)?,
        Commands::Focus(args) => {
            let storage = FocusStorage::new()?;
            commands::focus(&storage, &config, &user, args.command, format)?
        }
        Commands::Pomodoro(args) => {
            let storage = FocusStorage::new()?;
            commands::pomodoro(&storage, &config, &user, args.command, format)?
        }
        Commands::Config(args) => commands::config(&config, args.command, format)?,
    };

    println!("{output}");
    Ok(())
}
