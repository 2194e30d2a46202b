//! The co-author directory.
//!
//! Co-authors are the internal researchers a paper can be attributed to, as opposed to the
//! free-text external collaborators. The directory is maintained by administrators; teachers
//! only read it, and never see real email addresses.
//!
//! Email masking happens here and only here: [`CoAuthorDirectory::list`] replaces every email
//! with [`EMAIL_PLACEHOLDER`] unless the caller is an administrator.
//!
//! ```no_run
//! # use folio::Folio;
//! # async fn example(folio: &Folio) -> Result<(), folio::error::FolioError> {
//! for co_author in folio.co_authors().list(false).await? {
//!   println!("{} <{}>", co_author.full_name, co_author.email);
//! }
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::{
  database::{DatabaseInstruction, InsertCoAuthor, QueryCoAuthors, SetCoAuthorActive},
  paper::{CoAuthorRef, Department},
};

/// Email shown to callers who may not see real addresses.
pub const EMAIL_PLACEHOLDER: &str = "hidden@restricted";

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoAuthor {
  /// Directory identifier
  pub id:         String,
  /// Full display name
  pub full_name:  String,
  /// Contact email, or [`EMAIL_PLACEHOLDER`] for non-admin callers
  pub email:      String,
  /// Department, if recorded
  pub department: Option<Department>,
  /// Inactive entries are hidden from listings but still resolve on existing papers
  pub is_active:  bool,
}

impl CoAuthor {
  /// The reference attached to papers for this entry.
  pub fn to_ref(&self) -> CoAuthorRef {
    CoAuthorRef {
      id:         self.id.clone(),
      full_name:  self.full_name.clone(),
      department: self.department,
    }
  }

  /// Whether the email has been replaced with [`EMAIL_PLACEHOLDER`].
  pub fn is_masked(&self) -> bool { self.email == EMAIL_PLACEHOLDER }

  /// This entry with its email replaced by the placeholder.
  fn masked(self) -> Self { Self { email: EMAIL_PLACEHOLDER.to_string(), ..self } }
}

/// A new directory entry as supplied by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCoAuthor {
  /// Full display name
  pub full_name:  String,
  /// Contact email
  pub email:      String,
  /// Department
  pub department: Option<Department>,
}

impl NewCoAuthor {
  /// Creates an entry without a department.
  pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { full_name: full_name.into(), email: email.into(), department: None }
  }

  /// Sets the department.
  pub fn with_department(mut self, department: Department) -> Self {
    self.department = Some(department);
    self
  }
}

/// Accessor for the co-author directory.
#[derive(Debug, Clone, Copy)]
pub struct CoAuthorDirectory<'a> {
  /// Backing store
  db: &'a Database,
}

impl<'a> CoAuthorDirectory<'a> {
  /// Creates an accessor over `db`.
  pub fn new(db: &'a Database) -> Self { Self { db } }

  /// Lists active entries ordered by full name.
  ///
  /// Unless `caller_is_admin`, every email is replaced with [`EMAIL_PLACEHOLDER`].
  ///
  /// # Errors
  ///
  /// [`FolioError::Fetch`] when the store cannot be read.
  pub async fn list(&self, caller_is_admin: bool) -> Result<Vec<CoAuthor>> {
    let entries = QueryCoAuthors::active()
      .execute(self.db)
      .await
      .map_err(|e| FolioError::fetch("co-authors", e))?;
    debug!("Loaded {} co-authors (admin: {caller_is_admin})", entries.len());
    if caller_is_admin {
      Ok(entries)
    } else {
      Ok(entries.into_iter().map(CoAuthor::masked).collect())
    }
  }

  /// Resolves references into `{id, full_name, department}` tuples, in reference order.
  ///
  /// Unknown references are dropped.
  pub async fn resolve(&self, ids: &[String]) -> Result<Vec<CoAuthorRef>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let entries = QueryCoAuthors::by_ids(ids).execute(self.db).await?;
    Ok(entries.iter().map(CoAuthor::to_ref).collect())
  }

  /// Adds an entry.
  pub async fn add(&self, entry: &NewCoAuthor) -> Result<CoAuthor> {
    if entry.full_name.trim().is_empty() {
      return Err(FolioError::InvalidInput("co-author name must not be empty".into()));
    }
    let added = InsertCoAuthor::new(entry).execute(self.db).await?;
    info!("Added co-author {} ({})", added.full_name, added.id);
    Ok(added)
  }

  /// Hides an entry from listings. Existing paper references keep resolving.
  pub async fn deactivate(&self, id: &str) -> Result<()> {
    if SetCoAuthorActive::new(id, false).execute(self.db).await? {
      info!("Deactivated co-author {id}");
      Ok(())
    } else {
      Err(FolioError::NotFound(format!("co-author {id}")))
    }
  }
}
