mod cms;
mod commands;
mod config;
mod feed;
mod http;
mod inventory;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use config::Config;

/// Mirror a YouTube channel's uploads into a Webflow CMS collection
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create and publish CMS items for videos the collection does not have yet
    Sync {
        /// Report what would be created without writing to the CMS
        #[arg(long)]
        dry_run: bool,
    },
    /// List the channel's feed and whether each video is already in the collection
    Ls,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn run(command: Command, config: &Config) -> anyhow::Result<String> {
    match command {
        Command::Sync { dry_run } => {
            commands::sync::cmd_sync(config, dry_run).map(|report| report.to_string())
        }
        Command::Ls => commands::ls::cmd_ls(config),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();
    init_logger();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let command = args.command.unwrap_or(Command::Sync { dry_run: false });
    match run(command, &config) {
        Ok(message) => {
            if message.ends_with('\n') {
                print!("{}", message);
            } else {
                println!("{}", message);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
