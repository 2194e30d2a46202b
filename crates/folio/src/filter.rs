//! Filtering and search over a paper collection.
//!
//! [`apply`] is a pure function: it never touches a store, never mutates its input, and
//! returns the matching papers in their original order. A paper matches when every clause of
//! the [`FilterSpec`] holds; clauses whose field is empty (or [`Selector::All`]) always hold.
//!
//! | Clause          | Holds when                                                            |
//! |-----------------|-----------------------------------------------------------------------|
//! | `query`         | title, a keyword, a collaborator or a resolved co-author name contains it |
//! | `status`        | the status is equal                                                   |
//! | `collaborator`  | some external collaborator name contains it                           |
//! | `department`    | the department is equal                                               |
//! | `co_author`     | the co-author references include it (`all` selects every paper)       |
//! | `upload_*`      | the upload date lies within the bounds                                |
//! | `publish_*`     | the paper has a publish date and it lies within the bounds            |
//!
//! Text matching is case-insensitive substring matching on the text exactly as given; surrounding
//! whitespace is part of the needle. Date bounds are inclusive.
//!
//! # Examples
//!
//! ```
//! use folio::{
//!   filter::{FilterSpec, Selector},
//!   paper::Status,
//! };
//!
//! let spec = FilterSpec::default().with_query("graph").with_status(Status::Published);
//! assert_eq!(spec.status, Selector::Only(Status::Published));
//! assert!(!spec.is_empty());
//! assert!(FilterSpec::default().is_empty());
//! ```

use super::*;
use crate::paper::{Department, Paper, Status};

/// Either every value, or exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector<T> {
  /// Matches everything
  #[default]
  All,
  /// Matches only this value
  Only(T),
}

impl<T: PartialEq> Selector<T> {
  /// Whether `value` is selected.
  pub fn matches(&self, value: &T) -> bool {
    match self {
      Selector::All => true,
      Selector::Only(wanted) => wanted == value,
    }
  }

  /// Like [`Selector::matches`], for an attribute that may be absent. Absent values only match
  /// [`Selector::All`].
  pub fn matches_opt(&self, value: Option<&T>) -> bool {
    match (self, value) {
      (Selector::All, _) => true,
      (Selector::Only(wanted), Some(value)) => wanted == value,
      (Selector::Only(_), None) => false,
    }
  }

  /// Whether this is [`Selector::All`].
  pub fn is_all(&self) -> bool { matches!(self, Selector::All) }
}

impl<T> From<Option<T>> for Selector<T> {
  fn from(value: Option<T>) -> Self { value.map_or(Selector::All, Selector::Only) }
}

/// A conjunctive filter over papers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
  /// Free text matched against title, keywords, collaborators and co-author names
  pub query:        String,
  /// Required status
  pub status:       Selector<Status>,
  /// Text matched against external collaborator names
  pub collaborator: String,
  /// Required department
  pub department:   Selector<Department>,
  /// Co-author reference the paper must carry
  pub co_author:    Selector<String>,
  /// Earliest upload date
  pub upload_from:  Option<NaiveDate>,
  /// Latest upload date
  pub upload_to:    Option<NaiveDate>,
  /// Earliest publish date
  pub publish_from: Option<NaiveDate>,
  /// Latest publish date
  pub publish_to:   Option<NaiveDate>,
}

impl FilterSpec {
  /// Whether every clause is vacuous.
  pub fn is_empty(&self) -> bool { self == &FilterSpec::default() }

  /// Sets the free-text query.
  pub fn with_query(mut self, query: impl Into<String>) -> Self {
    self.query = query.into();
    self
  }

  /// Sets the status.
  pub fn with_status(mut self, status: Status) -> Self {
    self.status = Selector::Only(status);
    self
  }

  /// Requires an external collaborator whose name contains `name`.
  pub fn with_collaborator(mut self, name: impl Into<String>) -> Self {
    self.collaborator = name.into();
    self
  }

  /// Sets the department.
  pub fn with_department(mut self, department: Department) -> Self {
    self.department = Selector::Only(department);
    self
  }

  /// Requires the co-author reference `id`.
  pub fn with_co_author(mut self, id: impl Into<String>) -> Self {
    self.co_author = Selector::Only(id.into());
    self
  }

  /// Bounds the upload date; either side may be open.
  pub fn with_upload_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
    self.upload_from = from;
    self.upload_to = to;
    self
  }

  /// Bounds the publish date; either side may be open.
  pub fn with_publish_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
    self.publish_from = from;
    self.publish_to = to;
    self
  }

  /// Whether `paper` satisfies every clause.
  pub fn matches(&self, paper: &Paper) -> bool {
    self.matches_query(paper)
      && self.status.matches(&paper.status)
      && self.matches_collaborator(paper)
      && self.department.matches_opt(paper.department.as_ref())
      && self.matches_co_author(paper)
      && within(Some(paper.upload_date), self.upload_from, self.upload_to)
      && within(paper.publish_date, self.publish_from, self.publish_to)
  }

  /// Clause 1.
  fn matches_query(&self, paper: &Paper) -> bool {
    let query = self.query.to_lowercase();
    if query.is_empty() {
      return true;
    }
    contains(&paper.title, &query)
      || paper.keywords.iter().any(|k| contains(k, &query))
      || paper.collaborators.iter().any(|c| contains(c, &query))
      || paper.co_authors.iter().any(|c| contains(&c.full_name, &query))
  }

  /// Clause 3.
  fn matches_collaborator(&self, paper: &Paper) -> bool {
    let needle = self.collaborator.to_lowercase();
    needle.is_empty() || paper.collaborators.iter().any(|c| contains(c, &needle))
  }

  /// Clause 5.
  fn matches_co_author(&self, paper: &Paper) -> bool {
    match &self.co_author {
      Selector::All => true,
      Selector::Only(id) if id.is_empty() || id.eq_ignore_ascii_case("all") => true,
      Selector::Only(id) => paper.co_author_ids.iter().any(|c| c == id),
    }
  }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub(crate) fn contains(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

/// Inclusive date-range test. With any bound set, an absent date never matches.
pub(crate) fn within(
  date: Option<NaiveDate>,
  from: Option<NaiveDate>,
  to: Option<NaiveDate>,
) -> bool {
  if from.is_none() && to.is_none() {
    return true;
  }
  let Some(date) = date else {
    return false;
  };
  from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

/// Papers matching `spec`, in input order.
pub fn apply(papers: &[Paper], spec: &FilterSpec) -> Vec<Paper> {
  let matched: Vec<Paper> = papers.iter().filter(|p| spec.matches(p)).cloned().collect();
  trace!("Filter kept {} of {} papers", matched.len(), papers.len());
  matched
}

/// Papers whose title or a keyword contains `query`, in input order.
///
/// This is the lighter search used on a caller's own paper list.
pub fn quick_search(papers: &[Paper], query: &str) -> Vec<Paper> {
  let query = query.to_lowercase();
  papers
    .iter()
    .filter(|p| {
      query.is_empty()
        || contains(&p.title, &query)
        || p.keywords.iter().any(|k| contains(k, &query))
    })
    .cloned()
    .collect()
}

/// Papers owned by `identity`, in input order.
pub fn owned_by(papers: &[Paper], identity: &Identity) -> Vec<Paper> {
  papers.iter().filter(|p| p.is_owned_by(identity)).cloned().collect()
}
