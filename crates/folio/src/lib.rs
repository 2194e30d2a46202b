//! Research-paper catalog management.
//!
//! `folio` is the core of a departmental research portal. It provides:
//!
//! - Paper uploads with PDF storage and co-author attribution
//! - A directory of internal co-authors with role-gated email visibility
//! - Role resolution for callers (admin / teacher)
//! - In-memory filtering and search across a paper collection
//! - Import of publications from a Google Scholar author profile
//! - Report filtering and CSV/JSON export
//!
//! # Getting Started
//!
//! ```no_run
//! use folio::{
//!   filter::{self, FilterSpec},
//!   paper::{Identity, PaperDraft, Status},
//!   Config, Folio,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let folio = Folio::builder().with_config(Config::default()).build().await?;
//!   let me = Identity::from("teacher-42");
//!
//!   let draft = PaperDraft::new("Lattice Sieving Revisited").with_status(Status::InReview);
//!   folio.papers().create(Some(&me), &draft).await?;
//!
//!   let papers = folio.papers().list(&me).await?;
//!   let drafts = filter::apply(&papers, &FilterSpec::default().with_query("lattice"));
//!   println!("{} matching papers", drafts.len());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: Paper records and their enumerated attributes
//! - [`papers`]: The paper repository (list, create, update, PDF upload)
//! - [`co_author`]: The co-author directory
//! - [`role`]: Caller role resolution
//! - [`filter`]: The catalog filter/search engine
//! - [`scholar`]: Google Scholar import
//! - [`report`]: Report filtering, summaries and export
//! - [`session`]: A per-view paper collection that turns failures into notifications
//! - [`notification`]: User-facing outcome messages
//! - [`config`]: TOML configuration
//! - [`database`]: SQLite storage backend
//! - [`storage`]: PDF object storage

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
use url::Url;
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod co_author;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod notification;
pub mod paper;
pub mod papers;
pub mod report;
pub mod role;
pub mod scholar;
pub mod session;
pub mod storage;

pub use config::Config;

use crate::{
  co_author::CoAuthorDirectory,
  database::Database,
  error::*,
  paper::Identity,
  papers::PaperRepository,
  role::RoleResolver,
  scholar::ProfileStore,
  storage::Storage,
};

/// Handle bundling everything a portal needs to serve a caller.
///
/// A [`Folio`] owns the [`Config`] it was built with, the open [`Database`] and the PDF
/// [`Storage`]. Accessors borrow from it, so a single handle can serve many operations.
#[derive(Debug)]
pub struct Folio {
  /// Configuration this instance was built with
  pub config:   Config,
  /// Relational store for papers, the co-author directory, roles and profiles
  pub database: Database,
  /// Object store for uploaded PDFs
  pub storage:  Storage,
}

/// Builder for [`Folio`].
#[derive(Debug, Default)]
pub struct FolioBuilder {
  /// Configuration to build with, defaults to [`Config::default`]
  config: Option<Config>,
}

impl FolioBuilder {
  /// Uses the given configuration instead of the default one.
  pub fn with_config(mut self, config: Config) -> Self {
    self.config = Some(config);
    self
  }

  /// Opens the database and prepares the storage directory.
  pub async fn build(self) -> Result<Folio> {
    let config = self.config.unwrap_or_default();
    if let Some(parent) = config.database_path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    let database = Database::open(&config.database_path).await?;
    let storage = Storage::new(&config.storage_path, config.public_base_url.clone());
    tokio::fs::create_dir_all(storage.root()).await?;
    debug!("Opened folio at {:?}", config.database_path);
    Ok(Folio { config, database, storage })
  }
}

impl Folio {
  /// Starts building a [`Folio`].
  pub fn builder() -> FolioBuilder { FolioBuilder::default() }

  /// Loads the configuration stored in `config_dir` and builds a [`Folio`] from it.
  pub async fn from_path(config_dir: impl AsRef<Path>) -> Result<Self> {
    let config = Config::load(config_dir)?;
    Self::builder().with_config(config).build().await
  }

  /// Accessor for paper records.
  pub fn papers(&self) -> PaperRepository<'_> {
    PaperRepository::new(&self.database, &self.storage, self.config.resolution_window)
  }

  /// Accessor for the co-author directory.
  pub fn co_authors(&self) -> CoAuthorDirectory<'_> { CoAuthorDirectory::new(&self.database) }

  /// Resolver for caller roles.
  pub fn roles(&self) -> RoleResolver<'_> {
    RoleResolver::new(&self.database, self.config.role_fallback)
  }

  /// Linked Google Scholar IDs.
  pub fn profiles(&self) -> ProfileStore<'_> { ProfileStore::new(&self.database) }
}

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use folio::prelude::*;
///
/// async fn example(folio: &folio::Folio) -> Result<(), FolioError> {
///   let roles = folio.roles();
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    database::DatabaseInstruction,
    error::FolioError,
    notification::{Notification, Notifier},
  };
}
