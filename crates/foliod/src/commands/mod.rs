use super::*;

pub mod clean;
pub mod co_authors;
pub mod init;
pub mod papers;
pub mod report;
pub mod roles;
pub mod scholar;

pub use clean::clean;
pub use co_authors::{co_authors, CoAuthorCommands};
pub use init::{init, InitArgs};
pub use papers::{list, mine, show, update, upload, ListArgs, UpdateArgs, UploadArgs};
pub use report::{report, stats, ReportArgs};
pub use roles::{grant, role};
pub use scholar::{scholar, ScholarCommands};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration and create the catalog
  Init(InitArgs),

  /// List papers, optionally filtered
  List(ListArgs),

  /// List your own papers, optionally those whose title or a keyword matches
  Mine {
    /// Text to look for
    query: Option<String>,
  },

  /// Show one paper in full
  Show {
    /// Paper ID
    id: String,
  },

  /// Upload a new paper
  #[command(alias = "add")]
  Upload(UploadArgs),

  /// Change a paper you own (or any paper, as an admin)
  Update(UpdateArgs),

  /// Browse and maintain the co-author directory
  CoAuthors {
    /// Directory operation
    #[command(subcommand)]
    cmd: CoAuthorCommands,
  },

  /// Show your role
  Role,

  /// Assign a role to a user
  Grant {
    /// User to assign the role to
    user: String,

    /// Role to assign (admin, teacher, none)
    #[arg(value_parser = parse_arg::<Role>)]
    role: Role,
  },

  /// Link, fetch and import Google Scholar publications
  Scholar {
    /// Scholar operation
    #[command(subcommand)]
    cmd: ScholarCommands,
  },

  /// Export papers as CSV or JSON
  Report(ReportArgs),

  /// Count papers by status and department
  Stats,

  /// Remove the catalog database and stored PDFs after confirmation
  Clean,
}

/// Parses any catalog type that implements [`FromStr`].
pub fn parse_arg<T: FromStr<Err = FolioError>>(s: &str) -> std::result::Result<T, String> {
  T::from_str(s).map_err(|e| e.to_string())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
  NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
    .map_err(|e| format!("expected a date like 2024-01-31: {e}"))
}

/// The caller, or [`FoliodError::NoCaller`].
pub fn require_caller(caller: Option<&Identity>) -> Result<&Identity> {
  folio::paper::authenticated(caller).ok_or(FoliodError::NoCaller)
}

/// Fails unless `caller` resolves to an admin.
pub async fn require_admin(folio: &Folio, caller: Option<&Identity>) -> Result<()> {
  let caller = require_caller(caller)?;
  if folio.roles().resolve(Some(caller)).await.is_admin() {
    Ok(())
  } else {
    Err(FolioError::Forbidden.into())
  }
}
