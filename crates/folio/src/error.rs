//! Error types for the folio library.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side is
//! [`FolioError`]. The variants fall into two groups:
//!
//! - Portal-level failures a caller is expected to surface to a user, such as
//!   [`FolioError::AuthenticationRequired`], [`FolioError::Fetch`],
//!   [`FolioError::ImportProvider`] and [`FolioError::Upload`]
//! - Wrapped failures of the underlying machinery (SQLite, HTTP, filesystem, serialization)
//!
//! # Examples
//!
//! ```no_run
//! use folio::{error::FolioError, paper::PaperDraft, Folio};
//!
//! # async fn example(folio: &Folio) -> Result<(), FolioError> {
//! match folio.papers().create(None, &PaperDraft::new("Untitled")).await {
//!   Err(FolioError::AuthenticationRequired) => println!("Please log in first"),
//!   Err(e) => println!("Upload failed: {e}"),
//!   Ok(paper) => println!("Created {}", paper.id),
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use thiserror::Error;

/// Error type alias used for the [`folio`](crate) crate.
pub type Result<T> = core::result::Result<T, FolioError>;

/// Errors that can occur when working with the folio library.
#[derive(Error, Debug)]
pub enum FolioError {
  /// A mutating operation was attempted without an authenticated caller.
  #[error("Authentication required")]
  AuthenticationRequired,

  /// The caller is authenticated but not allowed to touch the record.
  ///
  /// Owners and administrators may update a paper; co-authors may also read it.
  #[error("You do not have access to this paper")]
  Forbidden,

  /// The requested record does not exist.
  #[error("Not found: {0}")]
  NotFound(String),

  /// Reading from the relational store failed.
  ///
  /// The string carries the description of the underlying failure.
  #[error("Failed to load {0}")]
  Fetch(String),

  /// The citation-data provider rejected the request or reported an error.
  ///
  /// The message is the provider's own, passed through verbatim.
  #[error("{0}")]
  ImportProvider(String),

  /// Storing a binary object failed or the object was rejected.
  ///
  /// This occurs when:
  /// - The file is not a PDF
  /// - The file exceeds the upload size ceiling
  /// - Writing to the object store fails
  #[error("Upload failed: {0}")]
  Upload(String),

  /// A stored or supplied status string is not one of `draft`, `in-review`, `published`.
  #[error("Invalid status, see `folio::paper::Status`: {0}")]
  InvalidStatus(String),

  /// A stored or supplied department code is not one of the eight known departments.
  #[error("Invalid department, see `folio::paper::Department`: {0}")]
  InvalidDepartment(String),

  /// A stored or supplied role string is not recognised.
  #[error("Invalid role, see `folio::role::Role`: {0}")]
  InvalidRole(String),

  /// Caller-supplied input was rejected before reaching any backend.
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// Configuration is missing or inconsistent.
  #[error("{0}")]
  Config(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A SQLite operation failed.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// JSON (de)serialization failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A URL could not be parsed or joined.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// The configuration file is not valid TOML.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be written as TOML.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),
}

impl FolioError {
  /// Converts a store failure into a [`FolioError::Fetch`] naming what was being loaded.
  pub(crate) fn fetch(what: &str, err: impl Display) -> Self {
    FolioError::Fetch(format!("{what}: {err}"))
  }
}
