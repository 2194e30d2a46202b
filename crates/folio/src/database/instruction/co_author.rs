//! Co-author directory instructions.

use super::*;
use crate::co_author::{CoAuthor, NewCoAuthor};

/// Columns selected for a co-author row, in the order [`co_author_from_row`] reads them.
const CO_AUTHOR_COLUMNS: &str = "co_authors.id, co_authors.full_name, co_authors.email, \
                                 co_authors.department, co_authors.is_active";

/// Which directory entries a [`QueryCoAuthors`] selects.
#[derive(Debug, Clone)]
pub enum CoAuthorCriteria {
  /// Every active entry, ordered by full name
  Active,
  /// The entries with the given identifiers, in the order given; unknown ids are skipped
  Ids(Vec<String>),
}

/// Selects entries from the co-author directory.
///
/// Emails are returned as stored; masking happens in
/// [`CoAuthorDirectory`](crate::co_author::CoAuthorDirectory).
#[derive(Debug, Clone)]
pub struct QueryCoAuthors {
  criteria: CoAuthorCriteria,
}

impl QueryCoAuthors {
  /// All active entries ordered by full name.
  pub fn active() -> Self { Self { criteria: CoAuthorCriteria::Active } }

  /// The entries referenced by `ids`, active or not.
  pub fn by_ids<S: AsRef<str>>(ids: &[S]) -> Self {
    Self { criteria: CoAuthorCriteria::Ids(ids.iter().map(|id| id.as_ref().to_string()).collect()) }
  }
}

#[async_trait]
impl DatabaseInstruction for QueryCoAuthors {
  type Output = Vec<CoAuthor>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let criteria = self.criteria.clone();
    db.call(move |conn| {
      let entries = match criteria {
        CoAuthorCriteria::Active => {
          let mut stmt = conn.prepare_cached(&format!(
            "SELECT {CO_AUTHOR_COLUMNS} FROM co_authors
             WHERE is_active = 1
             ORDER BY full_name COLLATE NOCASE, id"
          ))?;
          let rows = stmt.query_map([], co_author_from_row)?;
          rows.collect::<rusqlite::Result<Vec<_>>>()?
        },
        CoAuthorCriteria::Ids(ids) if ids.is_empty() => Vec::new(),
        CoAuthorCriteria::Ids(ids) => {
          let mut stmt = conn.prepare_cached(&format!(
            "SELECT {CO_AUTHOR_COLUMNS} FROM json_each(?1) AS wanted
             JOIN co_authors ON co_authors.id = wanted.value
             ORDER BY wanted.key"
          ))?;
          let rows = stmt.query_map([to_json_list(&ids)], co_author_from_row)?;
          rows.collect::<rusqlite::Result<Vec<_>>>()?
        },
      };
      Ok(entries)
    })
    .await
  }
}

/// Adds an entry to the directory and returns it.
#[derive(Debug, Clone)]
pub struct InsertCoAuthor {
  entry: NewCoAuthor,
}

impl InsertCoAuthor {
  /// Creates an insert for `entry`.
  pub fn new(entry: &NewCoAuthor) -> Self { Self { entry: entry.clone() } }
}

#[async_trait]
impl DatabaseInstruction for InsertCoAuthor {
  type Output = CoAuthor;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let entry = self.entry.clone();
    let id = uuid::Uuid::new_v4().to_string();
    debug!("Adding co-author {} as {id}", entry.full_name);
    db.call(move |conn| {
      conn.execute(
        "INSERT INTO co_authors (id, full_name, email, department, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        params![
          id,
          entry.full_name,
          entry.email,
          entry.department.map(|d| d.code()),
          format_timestamp(Utc::now()),
        ],
      )?;
      Ok(CoAuthor {
        id,
        full_name: entry.full_name,
        email: entry.email,
        department: entry.department,
        is_active: true,
      })
    })
    .await
  }
}

/// Flags a directory entry active or inactive. Returns whether an entry was changed.
#[derive(Debug, Clone)]
pub struct SetCoAuthorActive {
  id:     String,
  active: bool,
}

impl SetCoAuthorActive {
  /// Creates an update of entry `id`.
  pub fn new(id: impl Into<String>, active: bool) -> Self { Self { id: id.into(), active } }
}

#[async_trait]
impl DatabaseInstruction for SetCoAuthorActive {
  type Output = bool;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (id, active) = (self.id.clone(), self.active);
    db.call(move |conn| {
      let changed =
        conn.execute("UPDATE co_authors SET is_active = ?2 WHERE id = ?1", params![id, active])?;
      Ok(changed > 0)
    })
    .await
  }
}

/// Builds a [`CoAuthor`] from a row selected with [`CO_AUTHOR_COLUMNS`].
fn co_author_from_row(row: &Row<'_>) -> rusqlite::Result<CoAuthor> {
  Ok(CoAuthor {
    id:         row.get(0)?,
    full_name:  row.get(1)?,
    email:      row.get(2)?,
    department: optional_column::<Department>(row, 3)?,
    is_active:  row.get(4)?,
  })
}
