//! Staging and committing Scholar publications as papers.

use super::*;
use crate::{
  database::{DatabaseInstruction, GetScholarId, SetScholarId},
  paper::{authenticated, split_list, PaperDraft, Status},
  papers::PaperRepository,
};

/// Turns the selected publications into paper drafts.
///
/// Selection indices that are out of range are ignored and repeated indices collapse; the
/// drafts follow the order of first selection. Each draft has:
/// - the author string split on commas, trimmed, empty pieces dropped
/// - the year parsed from its leading digits, or nothing
/// - the publication link as its source URL
/// - status [`Status::Draft`]
pub fn stage_for_import(selected: &[usize], publications: &[Publication]) -> Vec<PaperDraft> {
  let mut seen = std::collections::HashSet::new();
  selected
    .iter()
    .filter(|&&index| seen.insert(index))
    .filter_map(|&index| publications.get(index))
    .map(stage)
    .collect()
}

/// Drafts every publication, in order.
pub fn stage_all(publications: &[Publication]) -> Vec<PaperDraft> {
  publications.iter().map(stage).collect()
}

/// One staged draft.
fn stage(publication: &Publication) -> PaperDraft {
  PaperDraft {
    title: publication.title.clone(),
    authors: split_list(&publication.authors),
    publication_year: parse_year(&publication.year),
    source_url: publication.link.clone(),
    status: Status::Draft,
    ..Default::default()
  }
}

/// Leading decimal digits of `year` as a number.
fn parse_year(year: &str) -> Option<i32> {
  let trimmed = year.trim();
  let end = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
  trimmed[..end].parse().ok()
}

/// Inserts every draft for `caller`, one at a time, and returns how many were stored.
///
/// Drafts that fail to insert are logged and skipped; nothing is rolled back or retried.
///
/// # Errors
///
/// [`FolioError::AuthenticationRequired`] when there is no caller.
pub async fn commit_import(
  repo: &PaperRepository<'_>,
  drafts: &[PaperDraft],
  caller: Option<&Identity>,
) -> Result<usize> {
  let caller = authenticated(caller).ok_or(FolioError::AuthenticationRequired)?;
  let mut committed = 0;
  for draft in drafts {
    match repo.create(Some(caller), draft).await {
      Ok(_) => committed += 1,
      Err(e) => warn!("Skipping import of \"{}\": {e}", draft.title),
    }
  }
  info!("Imported {committed} of {} publications for {caller}", drafts.len());
  Ok(committed)
}

/// The Scholar ID each user has linked to their profile.
#[derive(Debug, Clone, Copy)]
pub struct ProfileStore<'a> {
  /// Backing store
  db: &'a Database,
}

impl<'a> ProfileStore<'a> {
  /// Creates a store over `db`.
  pub fn new(db: &'a Database) -> Self { Self { db } }

  /// The linked Scholar ID of `user`, if any.
  pub async fn scholar_id(&self, user: &Identity) -> Result<Option<String>> {
    GetScholarId::new(user).execute(self.db).await
  }

  /// Links a Scholar ID (or a profile URL containing one) to `user`.
  pub async fn set_scholar_id(&self, user: &Identity, input: &str) -> Result<String> {
    let id = normalize_author_id(input)
      .ok_or_else(|| FolioError::InvalidInput(format!("not a Google Scholar ID: {input:?}")))?;
    SetScholarId::new(user, Some(&id)).execute(self.db).await?;
    debug!("Linked Scholar ID {id} to {user}");
    Ok(id)
  }

  /// Removes the link.
  pub async fn clear_scholar_id(&self, user: &Identity) -> Result<()> {
    SetScholarId::new(user, None).execute(self.db).await
  }
}
