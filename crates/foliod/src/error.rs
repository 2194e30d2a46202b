//! Error types for the folio CLI.

use std::path::PathBuf;

use thiserror::Error;

use super::*;

/// Errors that end a CLI invocation.
#[derive(Error, Debug)]
pub enum FoliodError {
  /// Errors from the catalog
  #[error(transparent)]
  Folio(#[from] FolioError),

  /// Prompt failures
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Reading or writing local files
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// No configuration in the configuration directory
  #[error("No folio configuration in {0:?}. Run `folio init` first.")]
  NotInitialized(PathBuf),

  /// The command needs an authenticated caller
  #[error("Please pass --user or set FOLIO_USER.")]
  NoCaller,

  /// The failure was already reported through a notification
  #[error("operation failed")]
  Reported,

  /// Bad or conflicting arguments
  #[error("{0}")]
  Usage(String),
}

/// Result alias for CLI operations
pub type Result<T> = core::result::Result<T, FoliodError>;
