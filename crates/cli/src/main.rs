// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use audiostories_config::{Config, ConfigManager};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod player;

fn credential_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .value_name("EMAIL")
                .required(true)
                .help("Account email"),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .value_name("PASSWORD")
                .required(true)
                .help("Account password"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Display name used when the account is created"),
        )
}

fn build_cli() -> Command {
    Command::new("audiostories")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Listen to stories read aloud and keep track of your favorites")
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("PATH")
                .help("Path to the database file (overrides the config)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .global(true),
        )
        .subcommand(
            Command::new("seed")
                .about("Import stories from a JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("FILE")
                        .help("JSON array of stories"),
                ),
        )
        .subcommand(Command::new("catalog").about("List all stories"))
        .subcommand(credential_args(
            Command::new("play")
                .about("Read a story aloud")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_name("STORY_ID")
                        .help("Story to play"),
                )
                .arg(
                    Arg::new("rate")
                        .short('r')
                        .long("rate")
                        .value_name("RATE")
                        .value_parser(clap::value_parser!(f32))
                        .help("Speech rate between 0.5 and 2.0"),
                )
                .arg(
                    Arg::new("voice")
                        .short('v')
                        .long("voice")
                        .value_name("NAME")
                        .help("Voice to read with"),
                ),
        ))
        .subcommand(credential_args(
            Command::new("stats").about("Show your most played stories"),
        ))
}

fn load_config(matches: &ArgMatches) -> (Config, Option<String>) {
    let manager = match matches.get_one::<String>("config") {
        Some(dir) => Ok(ConfigManager::with_directory(dir)),
        None => ConfigManager::new(),
    };

    match manager.and_then(|m| m.load_with_env_overrides()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let matches = build_cli().get_matches();
    let (config, config_error) = load_config(&matches);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}, using defaults", e);
    }
    commands::check_config(&config)?;

    let db_path = matches
        .get_one::<String>("database")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.app.database_path.clone());
    let backend = commands::open_backend(&db_path, &config)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    match matches.subcommand() {
        Some(("seed", sub_matches)) => {
            let file = sub_matches
                .get_one::<String>("file")
                .ok_or_else(|| anyhow::anyhow!("Story file is required"))?;
            commands::seed(&backend, &config, file.as_ref()).await
        }
        Some(("catalog", _)) => commands::show_catalog(&backend, &config).await,
        Some(("play", sub_matches)) => {
            let credentials = commands::Credentials::from_matches(sub_matches)?;
            let options = player::PlayOptions {
                story_id: sub_matches
                    .get_one::<String>("id")
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Story ID is required"))?,
                rate: sub_matches.get_one::<f32>("rate").copied(),
                voice: sub_matches.get_one::<String>("voice").cloned(),
            };
            player::play_story(&backend, &config, &credentials, options).await
        }
        Some(("stats", sub_matches)) => {
            let credentials = commands::Credentials::from_matches(sub_matches)?;
            commands::show_stats(&backend, &config, &credentials).await
        }
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
