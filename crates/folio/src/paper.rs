//! Core paper types for the research catalog.
//!
//! This module provides the record types that flow through every other part of the crate:
//!
//! - [`Paper`]: a persisted research paper with its resolved co-authors
//! - [`PaperDraft`]: the caller-supplied shape used to create or replace a paper
//! - [`Status`] and [`Department`]: the enumerated attributes of a paper
//! - [`Identity`]: the opaque identifier of an authenticated caller
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use folio::paper::{Department, PaperDraft, Status};
//!
//! let draft = PaperDraft::new("Graph Neural Networks for Traffic Forecasting")
//!   .with_paper_number("CSED-2024-017")
//!   .with_status(Status::Published)
//!   .with_department(Department::Csed)
//!   .with_collaborators(["R. Mehta", "L. Zhou"])
//!   .with_keywords(["gnn", "traffic"])
//!   .with_publish_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! assert_eq!(draft.status.to_string(), "published");
//! ```

use super::*;
use crate::role::Role;

/// Identifier of an authenticated caller.
///
/// Authentication itself happens outside this crate; whatever the identity provider hands out
/// is wrapped here and compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
  /// Wraps a raw identifier.
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// The raw identifier.
  pub fn as_str(&self) -> &str { &self.0 }

  /// Whether the identifier is empty or only whitespace. A blank identity names nobody.
  pub fn is_blank(&self) -> bool { self.0.trim().is_empty() }
}

/// The caller, if there is one that names somebody; a blank identity counts as no caller.
pub fn authenticated(caller: Option<&Identity>) -> Option<&Identity> {
  caller.filter(|caller| !caller.is_blank())
}

impl From<&str> for Identity {
  fn from(id: &str) -> Self { Self(id.to_string()) }
}

impl From<String> for Identity {
  fn from(id: String) -> Self { Self(id) }
}

impl Display for Identity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

/// Publication status of a paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
  /// Work in progress, not yet submitted
  #[default]
  Draft,
  /// Submitted and under review
  InReview,
  /// Accepted and published
  Published,
}

impl Status {
  /// Every status, in lifecycle order.
  pub const ALL: [Status; 3] = [Status::Draft, Status::InReview, Status::Published];

  /// The wire representation (`draft`, `in-review`, `published`).
  pub fn as_str(&self) -> &'static str {
    match self {
      Status::Draft => "draft",
      Status::InReview => "in-review",
      Status::Published => "published",
    }
  }
}

impl Display for Status {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Status {
  type Err = FolioError;

  fn from_str(s: &str) -> Result<Self> {
    match &s.trim().to_lowercase() as &str {
      "draft" => Ok(Status::Draft),
      "in-review" | "in_review" | "inreview" => Ok(Status::InReview),
      "published" => Ok(Status::Published),
      s => Err(FolioError::InvalidStatus(s.to_owned())),
    }
  }
}

/// Academic department a paper or co-author belongs to.
///
/// The set is fixed; the short codes are what the store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
  /// Computer Science & Engineering
  Csed,
  /// Electronics & Communication Engineering
  Eced,
  /// Mechanical Engineering
  Mced,
  /// Electrical & Instrumentation Engineering
  Eid,
  /// Metallurgical Engineering
  Med,
  /// Biotechnology
  Btd,
  /// Energy & Environmental Sciences
  Ees,
  /// Civil Engineering
  Ced,
}

impl Department {
  /// Every department, in catalog order.
  pub const ALL: [Department; 8] = [
    Department::Csed,
    Department::Eced,
    Department::Mced,
    Department::Eid,
    Department::Med,
    Department::Btd,
    Department::Ees,
    Department::Ced,
  ];

  /// The short code stored in the database (e.g. `csed`).
  pub fn code(&self) -> &'static str {
    match self {
      Department::Csed => "csed",
      Department::Eced => "eced",
      Department::Mced => "mced",
      Department::Eid => "eid",
      Department::Med => "med",
      Department::Btd => "btd",
      Department::Ees => "ees",
      Department::Ced => "ced",
    }
  }

  /// Human-readable department name.
  pub fn name(&self) -> &'static str {
    match self {
      Department::Csed => "Computer Science & Engineering",
      Department::Eced => "Electronics & Communication Engineering",
      Department::Mced => "Mechanical Engineering",
      Department::Eid => "Electrical & Instrumentation Engineering",
      Department::Med => "Metallurgical Engineering",
      Department::Btd => "Biotechnology",
      Department::Ees => "Energy & Environmental Sciences",
      Department::Ced => "Civil Engineering",
    }
  }
}

impl Display for Department {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.code()) }
}

impl FromStr for Department {
  type Err = FolioError;

  fn from_str(s: &str) -> Result<Self> {
    let needle = s.trim().to_lowercase();
    Department::ALL
      .into_iter()
      .find(|d| d.code() == needle || d.name().to_lowercase() == needle)
      .ok_or(FolioError::InvalidDepartment(needle))
  }
}

/// A co-author reference resolved against the directory.
///
/// Only the fields needed for display and search are carried; the full record lives in
/// [`CoAuthor`](crate::co_author::CoAuthor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoAuthorRef {
  /// Directory identifier
  pub id:         String,
  /// Full display name
  pub full_name:  String,
  /// Department, when the directory knows it
  pub department: Option<Department>,
}

/// A persisted research paper.
///
/// Papers are created through [`PaperRepository::create`](crate::papers::PaperRepository::create)
/// (or the Scholar import) and carry their owner for their whole life. The
/// [`co_authors`](Paper::co_authors) list is not stored; it is attached by the repository from
/// [`co_author_ids`](Paper::co_author_ids) every time a paper is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
  /// System-assigned identifier
  pub id:               String,
  /// User-assigned number, not guaranteed unique
  pub paper_number:     String,
  /// The paper's full title
  pub title:            String,
  /// External collaborators, in the order given
  pub collaborators:    Vec<String>,
  /// Free-text author list, filled by imports
  pub authors:          Vec<String>,
  /// References into the co-author directory
  pub co_author_ids:    Vec<String>,
  /// Directory entries resolved from `co_author_ids`
  pub co_authors:       Vec<CoAuthorRef>,
  /// Day the paper was uploaded
  pub upload_date:      NaiveDate,
  /// Day the paper was published, if it has been
  pub publish_date:     Option<NaiveDate>,
  /// Publication status
  pub status:           Status,
  /// Search keywords
  pub keywords:         Vec<String>,
  /// URL or storage path of the PDF
  pub pdf_url:          Option<String>,
  /// Owning department
  pub department:       Option<Department>,
  /// Year of publication, filled by imports
  pub publication_year: Option<i32>,
  /// Link to the paper at an external source
  pub source_url:       Option<String>,
  /// Digital Object Identifier, when known
  pub doi:              Option<String>,
  /// Identity of the uploader, set once at creation
  pub owner:            Identity,
  /// Creation timestamp, used for ordering
  pub created_at:       DateTime<Utc>,
}

impl Paper {
  /// Whether `identity` is this paper's owner.
  pub fn is_owned_by(&self, identity: &Identity) -> bool { &self.owner == identity }

  /// Whether `identity` owns this paper or is one of its co-authors.
  pub fn is_visible_to(&self, identity: &Identity) -> bool {
    self.is_owned_by(identity) || self.co_author_ids.iter().any(|id| id == identity.as_str())
  }

  /// Whether `identity`, holding `role`, may replace this paper's contents.
  pub fn is_editable_by(&self, identity: &Identity, role: Role) -> bool {
    self.is_owned_by(identity) || role.is_admin()
  }

  /// Whether a PDF is attached.
  pub fn has_pdf(&self) -> bool { self.pdf_url.as_deref().is_some_and(|url| !url.is_empty()) }

  /// The caller-editable part of this paper.
  pub fn to_draft(&self) -> PaperDraft {
    PaperDraft {
      paper_number:     self.paper_number.clone(),
      title:            self.title.clone(),
      collaborators:    self.collaborators.clone(),
      authors:          self.authors.clone(),
      co_author_ids:    self.co_author_ids.clone(),
      upload_date:      Some(self.upload_date),
      publish_date:     self.publish_date,
      status:           self.status,
      keywords:         self.keywords.clone(),
      pdf_url:          self.pdf_url.clone(),
      department:       self.department,
      publication_year: self.publication_year,
      source_url:       self.source_url.clone(),
      doi:              self.doi.clone(),
    }
  }
}

/// Caller-supplied paper contents, used for creation and full-record updates.
///
/// No validation beyond what the store enforces is applied; fields are persisted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperDraft {
  /// User-assigned number
  pub paper_number:     String,
  /// Title, must be non-empty for the store to accept it
  pub title:            String,
  /// External collaborators
  pub collaborators:    Vec<String>,
  /// Free-text author list
  pub authors:          Vec<String>,
  /// References into the co-author directory
  pub co_author_ids:    Vec<String>,
  /// Upload day, defaults to today when absent
  pub upload_date:      Option<NaiveDate>,
  /// Publication day
  pub publish_date:     Option<NaiveDate>,
  /// Publication status
  pub status:           Status,
  /// Search keywords
  pub keywords:         Vec<String>,
  /// URL of the stored PDF
  pub pdf_url:          Option<String>,
  /// Owning department
  pub department:       Option<Department>,
  /// Year of publication
  pub publication_year: Option<i32>,
  /// External source link
  pub source_url:       Option<String>,
  /// Digital Object Identifier
  pub doi:              Option<String>,
}

impl PaperDraft {
  /// Starts a draft with the given title and every other field empty.
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Default::default() }
  }

  /// Sets the internal paper number.
  pub fn with_paper_number(mut self, number: impl Into<String>) -> Self {
    self.paper_number = number.into();
    self
  }

  /// Sets the status.
  pub fn with_status(mut self, status: Status) -> Self {
    self.status = status;
    self
  }

  /// Sets the department.
  pub fn with_department(mut self, department: Department) -> Self {
    self.department = Some(department);
    self
  }

  /// Replaces the external collaborators.
  pub fn with_collaborators<S: Into<String>>(
    mut self,
    names: impl IntoIterator<Item = S>,
  ) -> Self {
    self.collaborators = names.into_iter().map(Into::into).collect();
    self
  }

  /// Replaces the keywords.
  pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
    self.keywords = keywords.into_iter().map(Into::into).collect();
    self
  }

  /// Replaces the co-author references. Repeats are collapsed when stored.
  pub fn with_co_authors<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
    self.co_author_ids = ids.into_iter().map(Into::into).collect();
    self
  }

  /// Sets the upload date.
  pub fn with_upload_date(mut self, date: NaiveDate) -> Self {
    self.upload_date = Some(date);
    self
  }

  /// Sets the publish date.
  pub fn with_publish_date(mut self, date: NaiveDate) -> Self {
    self.publish_date = Some(date);
    self
  }

  /// Attaches the public URL of an uploaded PDF.
  pub fn with_pdf_url(mut self, url: impl Into<String>) -> Self {
    self.pdf_url = Some(url.into());
    self
  }
}

/// Splits a comma-separated list, trimming each entry and dropping empty ones.
///
/// ```
/// assert_eq!(folio::paper::split_list(" a, b ,,c "), vec!["a", "b", "c"]);
/// ```
pub fn split_list(input: &str) -> Vec<String> {
  input.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}
