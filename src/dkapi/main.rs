use clap::Parser;
use colored::*;
use dkapi::api::{CmdMessage, MessageLevel, Operation, SearchOptions, Session};
use dkapi::config::Settings;
use dkapi::error::{DkapiError, Result};
use dkapi::http::client::ReqwestTransport;
use dkapi::store::fs::FileStore;
use std::error::Error;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Command};

fn main() {
    let cli = Cli::parse_from(args::expand_legacy_flags(std::env::args_os()));
    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;
    let state_file = settings.paths.state_file.clone();

    let mut session = match Session::open(FileStore::new(settings.paths)) {
        Ok(session) => session,
        Err(e) => {
            eprintln!(
                "{} {}: {}",
                "Failed to load state/config file".red(),
                state_file.display(),
                e
            );
            std::process::exit(1);
        }
    };

    // The override only applies to this run; the stored flag is saved as loaded.
    let debug = cli.debug_override().unwrap_or(session.state().debug_enabled);
    init_tracing(debug);
    if debug {
        tracing::info!("Debug output is enabled.");
    }

    let operation = operation(&cli)?;
    let transport = ReqwestTransport::new(settings.timeout)?;

    let result = session.run(transport, settings.endpoints, &operation)?;
    if let Some(output) = &result.output {
        println!("{}", output);
    }
    print_messages(&result.messages);
    Ok(())
}

fn operation(cli: &Cli) -> Result<Operation> {
    Ok(match cli.command {
        Command::NewAuthStep1 => Operation::AuthorizationUrl,
        Command::NewAuthStep2 => Operation::TokenUrl {
            code: require_param(
                cli,
                "Must specify the 'code' that was provided by the site in response to NEW_AUTH_STEP1 using -P.",
            )?,
        },
        Command::PerformAuthStep1 => Operation::RequestCode,
        Command::PerformAuthStep2 => Operation::ExchangeCode {
            code: require_param(
                cli,
                "Must specify the 'code' that was provided by the site in response to PERFORM_AUTH_STEP1 using -P.",
            )?,
        },
        Command::Authenticate => Operation::Authenticate,
        Command::RefreshAuth => Operation::Refresh,
        Command::PartSearch => Operation::PartSearch {
            part: require_param(
                cli,
                "Must specify the Digi-Key part number using -P when the command is PART_SEARCH.",
            )?,
            quantity: cli.count,
            options: SearchOptions {
                compact: cli.compact_json,
                remove_media_links: cli.rm_media_links,
                remove_primary_photo: cli.rm_primary_photo,
                remove_primary_datasheet: cli.rm_primary_datasheet,
            },
        },
        Command::DebugNoop => Operation::DebugNoop,
    })
}

fn require_param(cli: &Cli, message: &str) -> Result<String> {
    cli.param
        .clone()
        .ok_or_else(|| DkapiError::Api(message.to_string()))
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "dkapi=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Standard output is reserved for command payloads, so status messages go
/// to standard error.
fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
            MessageLevel::Success => eprintln!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        }
    }
}
