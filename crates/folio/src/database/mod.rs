//! Local SQLite storage for the research catalog.
//!
//! The database holds four tables:
//! - `papers`: paper records, list-valued fields stored as JSON arrays
//! - `co_authors`: the directory of internal co-authors
//! - `user_roles`: one role row per identity
//! - `profiles`: per-identity profile data (the linked Google Scholar ID)
//!
//! The schema is created when the database is opened. All access goes through
//! [`DatabaseInstruction`] implementations in [`instruction`].
//!
//! # Examples
//!
//! ```no_run
//! use folio::{
//!   database::{Database, DatabaseInstruction, QueryPapers},
//!   paper::Identity,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open(Database::default_path()).await?;
//! let papers = QueryPapers::visible_to(&Identity::from("teacher-42")).execute(&db).await?;
//! println!("{} papers", papers.len());
//! # Ok(())
//! # }
//! ```

use rusqlite::{types::Type, Row};
use tokio_rusqlite::Connection;

use super::*;
use crate::paper::{Department, Paper, Status};

pub mod instruction;
#[cfg(test)] mod tests;

pub use self::instruction::*;

/// Handle for interacting with the catalog database.
pub struct Database {
  /// Async SQLite connection handle
  conn: Connection,
}

impl std::fmt::Debug for Database {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Database").finish_non_exhaustive()
  }
}

impl Database {
  /// Opens an existing database or creates a new one at the specified path.
  ///
  /// The schema in `migrations/init.sql` is applied on every open; it only creates what is
  /// missing.
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use folio::database::Database;
  /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
  /// let db = Database::open("catalog.db").await?;
  /// # Ok(())
  /// # }
  /// ```
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path.as_ref()).await?;
    migrate(&conn).await?;
    Ok(Self { conn })
  }

  /// Opens a private in-memory database, mostly useful in tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    migrate(&conn).await?;
    Ok(Self { conn })
  }

  /// Returns the default path for the database file.
  ///
  /// See [`Config::default_database_path`].
  pub fn default_path() -> PathBuf { Config::default_database_path() }

  /// Runs `function` against the underlying connection on the database thread.
  pub(crate) async fn call<F, R>(&self, function: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> core::result::Result<R, tokio_rusqlite::Error>
      + Send
      + 'static,
    R: Send + 'static, {
    Ok(self.conn.call(function).await?)
  }
}

/// Applies `migrations/init.sql`; only missing tables and indexes are created.
async fn migrate(conn: &Connection) -> Result<()> {
  conn
    .call(|conn| {
      conn.execute_batch(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/migrations/init.sql"
      )))?;
      Ok(())
    })
    .await?;
  Ok(())
}

/// Columns selected for a paper row, in the order [`paper_from_row`] reads them.
pub(crate) const PAPER_COLUMNS: &str = "id, paper_number, title, collaborators, authors, \
                                        co_author_ids, upload_date, publish_date, status, \
                                        keywords, pdf_url, department, publication_year, \
                                        source_url, doi, owner, created_at";

/// Builds a [`Paper`] (without resolved co-authors) from a row selected with
/// [`PAPER_COLUMNS`].
pub(crate) fn paper_from_row(row: &Row<'_>) -> rusqlite::Result<Paper> {
  Ok(Paper {
    id:               row.get(0)?,
    paper_number:     row.get(1)?,
    title:            row.get(2)?,
    collaborators:    json_list(row, 3)?,
    authors:          json_list(row, 4)?,
    co_author_ids:    json_list(row, 5)?,
    co_authors:       Vec::new(),
    upload_date:      row.get(6)?,
    publish_date:     row.get(7)?,
    status:           parse_column::<Status>(row, 8)?,
    keywords:         json_list(row, 9)?,
    pdf_url:          row.get(10)?,
    department:       optional_column::<Department>(row, 11)?,
    publication_year: row.get(12)?,
    source_url:       row.get(13)?,
    doi:              row.get(14)?,
    owner:            Identity::new(row.get::<_, String>(15)?),
    created_at:       timestamp_column(row, 16)?,
  })
}

/// Encodes a list as the JSON array stored in list-valued columns.
pub(crate) fn to_json_list(items: &[String]) -> String {
  serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a JSON-array column.
pub(crate) fn json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
  let raw: String = row.get(idx)?;
  serde_json::from_str(&raw)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses a text column through [`FromStr`].
pub(crate) fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where T: FromStr<Err = FolioError> {
  T::from_str(&row.get::<_, String>(idx)?)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses a nullable text column through [`FromStr`].
pub(crate) fn optional_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where T: FromStr<Err = FolioError> {
  row
    .get::<_, Option<String>>(idx)?
    .map(|raw| {
      T::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Reads an RFC 3339 timestamp column.
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(&row.get::<_, String>(idx)?)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Formats a timestamp as fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
