use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

mod cli;
mod commands;
mod completion;
mod config;
mod database;
mod history;
mod logging;
mod render;

use cli::{Cli, CliOptions};
use config::Config;
use render::RenderMode;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = build_command().get_matches();
    logging::init_logging(matches.get_flag("verbose"))?;

    let config_path = match matches.get_one::<PathBuf>("config") {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("load config {}", config_path.display()))?;

    let options = resolve_options(&matches, &config)?;
    let mut cli = Cli::new(options)?;
    cli.run()
}

fn build_command() -> Command {
    Command::new("sqlite-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("An interactive SQLite client with completion, expanded and JSON output")
        .arg(
            Arg::new("database")
                .value_name("DATABASE")
                .help("SQLite database file to open")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file to use instead of the default location")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("history-file")
                .long("history-file")
                .value_name("PATH")
                .help("History file to use (default: ~/.vsqlite_history)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_name("MODE")
                .help("Initial output mode")
                .value_parser(["table", "expanded", "json"]),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue),
        )
}

/// Flags win over the config file.
fn resolve_options(matches: &ArgMatches, config: &Config) -> Result<CliOptions> {
    let database = matches
        .get_one::<PathBuf>("database")
        .cloned()
        .context("missing database path")?;

    let mode = match matches.get_one::<String>("mode") {
        Some(mode) => mode.parse::<RenderMode>()?,
        None => config.display_mode(),
    };

    let history_path = if let Some(path) = matches.get_one::<PathBuf>("history-file") {
        Some(path.clone())
    } else if config.history_enabled() {
        config.history_path()
    } else {
        None
    };

    Ok(CliOptions {
        database,
        history_path,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str], config: &Config) -> Result<CliOptions> {
        let matches = build_command().try_get_matches_from(args)?;
        resolve_options(&matches, config)
    }

    #[test]
    fn database_argument_is_required() {
        assert!(build_command()
            .try_get_matches_from(["sqlite-cli"])
            .is_err());
    }

    #[test]
    fn defaults_come_from_config() -> Result<()> {
        let resolved = options(&["sqlite-cli", "app.db"], &Config::default())?;
        assert_eq!(resolved.database, PathBuf::from("app.db"));
        assert_eq!(resolved.mode, RenderMode::Table);
        assert_eq!(resolved.history_path, Config::default().history_path());
        Ok(())
    }

    #[test]
    fn flags_override_config() -> Result<()> {
        let mut config = Config::default();
        config.display.mode = Some(RenderMode::Expanded);
        config.history.path = Some("/from/config".to_string());

        let resolved = options(
            &[
                "sqlite-cli",
                "app.db",
                "--mode",
                "json",
                "--history-file",
                "/from/flag",
            ],
            &config,
        )?;
        assert_eq!(resolved.mode, RenderMode::Json);
        assert_eq!(resolved.history_path, Some(PathBuf::from("/from/flag")));
        Ok(())
    }

    #[test]
    fn config_mode_applies_without_flag() -> Result<()> {
        let mut config = Config::default();
        config.display.mode = Some(RenderMode::Expanded);
        let resolved = options(&["sqlite-cli", "app.db"], &config)?;
        assert_eq!(resolved.mode, RenderMode::Expanded);
        Ok(())
    }

    #[test]
    fn disabled_history_has_no_file() -> Result<()> {
        let mut config = Config::default();
        config.history.enabled = Some(false);
        let resolved = options(&["sqlite-cli", "app.db"], &config)?;
        assert_eq!(resolved.history_path, None);
        Ok(())
    }

    #[test]
    fn unknown_mode_is_rejected_by_the_parser() {
        assert!(build_command()
            .try_get_matches_from(["sqlite-cli", "app.db", "--mode", "vertical"])
            .is_err());
    }

    #[test]
    fn verbose_flag_is_a_switch() -> Result<()> {
        let matches = build_command().try_get_matches_from(["sqlite-cli", "-v", "app.db"])?;
        assert!(matches.get_flag("verbose"));
        Ok(())
    }
}
