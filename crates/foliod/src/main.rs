//! Command line front end for the folio research-paper catalog.
//!
//! The `folio` binary drives a local catalog: uploading papers, maintaining the co-author
//! directory, importing publications from Google Scholar and exporting reports.
//!
//! # Usage
//!
//! ```bash
//! # Write a configuration and create the database
//! folio init
//!
//! # Upload a paper as the given user
//! folio --user teacher-42 upload "Lattice Sieving Revisited" --pdf sieving.pdf --keyword lattices
//!
//! # List your papers, narrowed by a filter
//! folio --user teacher-42 list --query lattice --status draft
//!
//! # Import publications from a Scholar profile
//! folio --user teacher-42 scholar import JicYPdAAAAAJ --all
//!
//! # Export a report
//! folio --user dean report --format csv --output papers.csv
//! ```
//!
//! The caller is taken from `--user`, or from `FOLIO_USER` when the flag is absent. Without
//! either, commands run unauthenticated and anything that writes is refused.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, str::FromStr};

use chrono::NaiveDate;
use clap::{builder::ArgAction, Args, Parser, Subcommand, ValueEnum};
use console::style;
use folio::{
  error::FolioError,
  paper::{Department, Identity, Paper, PaperDraft, Status},
  prelude::*,
  role::Role,
  session::Catalog,
  Config, Folio,
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Environment variable naming the caller when `--user` is not given
const USER_ENV: &str = "FOLIO_USER";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Command line front end for the folio research-paper catalog")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration directory. Defaults to the platform configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Identity to act as
  #[arg(long, short, global = true)]
  user: Option<String>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration directory in use.
  fn config_dir(&self) -> Result<PathBuf> {
    match &self.config {
      Some(dir) => Ok(dir.clone()),
      None => Ok(Config::default_path()?),
    }
  }

  /// The caller, from `--user` or the environment.
  fn caller(&self) -> Option<Identity> {
    self
      .user
      .clone()
      .or_else(|| std::env::var(USER_ENV).ok())
      .filter(|user| !user.trim().is_empty())
      .map(Identity::from)
  }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Opens the catalog configured in `config_dir`.
async fn open(config_dir: &std::path::Path) -> Result<Folio> {
  Folio::from_path(config_dir).await.map_err(|e| {
    debug!("Could not open catalog: {e}");
    FoliodError::NotInitialized(config_dir.to_path_buf())
  })
}

/// Runs the parsed command.
async fn run(cli: Cli) -> Result<()> {
  let config_dir = cli.config_dir()?;
  let caller = cli.caller();
  let terminal = Terminal::new(cli.accept_defaults);
  trace!("Using configuration directory {config_dir:?}, caller {caller:?}");

  let command = match cli.command {
    Commands::Init(args) => return init(&terminal, &config_dir, args).await,
    Commands::Clean => {
      let config = Config::load(&config_dir)
        .map_err(|_| FoliodError::NotInitialized(config_dir.clone()))?;
      return clean(&terminal, &config).await;
    },
    command => command,
  };
  let folio = open(&config_dir).await?;

  match command {
    Commands::Init(_) | Commands::Clean => Ok(()),
    Commands::List(args) => list(&terminal, &folio, caller, args).await,
    Commands::Mine { query } => {
      mine(&terminal, &folio, caller, query.as_deref().unwrap_or_default()).await
    },
    Commands::Show { id } => show(&terminal, &folio, caller, &id).await,
    Commands::Upload(args) => upload(&terminal, &folio, caller, args).await,
    Commands::Update(args) => update(&terminal, &folio, caller, args).await,
    Commands::CoAuthors { cmd } => co_authors(&terminal, &folio, caller, cmd).await,
    Commands::Role => role(&terminal, &folio, caller).await,
    Commands::Grant { user, role } => grant(&terminal, &folio, &user, role).await,
    Commands::Scholar { cmd } => scholar(&terminal, &folio, caller, cmd).await,
    Commands::Report(args) => report(&terminal, &folio, caller, args).await,
    Commands::Stats => stats(&terminal, &folio, caller).await,
  }
}

/// Entry point for the folio CLI application
///
/// Parses arguments, sets up logging and runs the command. Failures are printed with an error
/// prefix and end the process with a non-zero status.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  if let Err(e) = run(cli).await {
    if !matches!(e, FoliodError::Reported) {
      eprintln!("{} {e}", style(ERROR_PREFIX).red());
    }
    std::process::exit(1);
  }
}
