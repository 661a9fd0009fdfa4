use crate::config::ConfigFile;
use crate::constants::TOKEN_ENV_VAR;
use crate::errors::{AppError, AppResult};
use crate::upstream::OfdClient;
use crate::utils::parse_date;
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

fn date_arg() -> Arg {
    Arg::new("date")
        .short('d')
        .long("date")
        .help("Calendar day to fetch (YYYY-MM-DD), defaults to today")
        .action(ArgAction::Set)
}

/// Builds the command-line definition.
pub fn build_cli() -> Command {
    Command::new("ofd-ya")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .help("API token (falls back to OFD_YA_TOKEN, then the config file)")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("jsonl")
                .long("jsonl")
                .help("Print one JSON object per line instead of a pretty array")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("receipts")
                .about("Fetch the receipts of every register for a day")
                .arg(date_arg()),
        )
        .subcommand(
            Command::new("registers")
                .about("List the registers (KKT) of the account for a day")
                .arg(date_arg()),
        )
        .subcommand(
            Command::new("documents")
                .about("Fetch the receipts of a single register for a day")
                .arg(date_arg())
                .arg(
                    Arg::new("register")
                        .short('r')
                        .long("register")
                        .help("Registration id of the register")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
}

/// Parses command-line arguments and runs the selected subcommand.
///
/// Results are printed to stdout as JSON. For `receipts`, partial results are
/// printed before a collection error is returned.
///
/// # Errors
///
/// Returns an error if the configuration or token cannot be resolved, the
/// date is malformed, an upstream call fails, or output cannot be written.
pub async fn cli() -> AppResult<()> {
    let mut cmd_for_help = build_cli();
    let matches = build_cli().get_matches();

    let Some((name, sub)) = matches.subcommand() else {
        cmd_for_help
            .print_help()
            .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        return Ok(());
    };

    let config_file = match sub.get_one::<PathBuf>("config") {
        Some(path) => ConfigFile::from_toml_file(path)?,
        None => ConfigFile::default(),
    };
    let token = resolve_token(
        sub.get_one::<String>("token").map(String::as_str),
        std::env::var(TOKEN_ENV_VAR).ok(),
        config_file.token.as_deref(),
    )?;
    let client = OfdClient::with_config(token, &config_file.client)?;
    let jsonl = sub.get_flag("jsonl");
    let date = date_from_matches(sub)?;

    match name {
        "receipts" => {
            let batch = client.collect_receipts(date).await;
            print_json(&batch.receipts, jsonl)?;
            if let Some(e) = batch.error {
                warn!(
                    printed = batch.receipts.len(),
                    "Receipt list is incomplete"
                );
                return Err(e);
            }
            info!(receipts = batch.receipts.len(), "Done");
        }
        "registers" => {
            let registers = client.fetch_registers(date).await?;
            print_json(&registers, jsonl)?;
        }
        "documents" => {
            let register = sub
                .get_one::<String>("register")
                .ok_or_else(|| AppError::InvalidInput("--register is required".into()))?;
            let receipts = client.receipts_for_register(register, date).await?;
            print_json(&receipts, jsonl)?;
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

fn date_from_matches(sub: &ArgMatches) -> AppResult<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw),
        None => Ok(Local::now().date_naive()),
    }
}

/// Picks the token from the command line, the environment or the config
/// file, in that order. Blank values are skipped.
pub fn resolve_token(
    from_cli: Option<&str>,
    from_env: Option<String>,
    from_file: Option<&str>,
) -> AppResult<String> {
    from_cli
        .map(str::to_string)
        .into_iter()
        .chain(from_env)
        .chain(from_file.map(str::to_string))
        .find(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "No API token given; use --token, {TOKEN_ENV_VAR} or the config file"
            ))
        })
}

fn print_json<T: Serialize>(items: &[T], jsonl: bool) -> AppResult<()> {
    if jsonl {
        for item in items {
            println!("{}", serde_json::to_string(item)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(items)?);
    }
    Ok(())
}
