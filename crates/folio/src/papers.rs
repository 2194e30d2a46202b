//! The paper repository.
//!
//! [`PaperRepository`] is the only way papers enter or leave the store. Every read re-derives
//! its result from the database and attaches resolved co-authors to each paper; nothing is
//! cached between calls.
//!
//! Co-author resolution runs one directory lookup per paper that references co-authors. At
//! most `resolution_window` lookups are in flight at a time and results keep the order of the
//! papers they belong to. A failed lookup is logged and leaves that paper with no resolved
//! co-authors; it never fails the whole read.
//!
//! # Examples
//!
//! ```no_run
//! use folio::{paper::{Identity, PaperDraft}, Folio};
//!
//! # async fn example(folio: &Folio) -> Result<(), Box<dyn std::error::Error>> {
//! let me = Identity::from("teacher-42");
//! let bytes = std::fs::read("draft.pdf")?;
//! let url = folio.papers().upload_binary(Some(&me), "draft.pdf", &bytes).await?;
//! let draft = PaperDraft::new("Draft").with_pdf_url(url.as_str());
//! let paper = folio.papers().create(Some(&me), &draft).await?;
//! assert_eq!(paper.owner, me);
//! # Ok(())
//! # }
//! ```

use futures::{stream, StreamExt};

use super::*;
use crate::{
  database::{DatabaseInstruction, InsertPaper, QueryPapers, ReplacePaper},
  paper::{authenticated, Paper, PaperDraft},
  role::Role,
};

/// Accessor for paper records and their PDFs.
#[derive(Debug, Clone, Copy)]
pub struct PaperRepository<'a> {
  /// Relational store
  db:                &'a Database,
  /// Object store for PDFs
  storage:           &'a Storage,
  /// Maximum number of co-author lookups in flight
  resolution_window: usize,
}

impl<'a> PaperRepository<'a> {
  /// Creates a repository. A window of zero is treated as one.
  pub fn new(db: &'a Database, storage: &'a Storage, resolution_window: usize) -> Self {
    Self { db, storage, resolution_window: resolution_window.max(1) }
  }

  /// Papers the caller owns or is a co-author on, newest first.
  ///
  /// # Errors
  ///
  /// [`FolioError::Fetch`] when the store cannot be read.
  pub async fn list(&self, caller: &Identity) -> Result<Vec<Paper>> {
    let papers = QueryPapers::visible_to(caller)
      .execute(self.db)
      .await
      .map_err(|e| FolioError::fetch("papers", e))?;
    debug!("Loaded {} papers for {caller}", papers.len());
    Ok(self.resolve_co_authors(papers).await)
  }

  /// Every paper in the catalog, newest first.
  ///
  /// # Errors
  ///
  /// [`FolioError::Fetch`] when the store cannot be read.
  pub async fn list_all(&self) -> Result<Vec<Paper>> {
    let papers =
      QueryPapers::list_all().execute(self.db).await.map_err(|e| FolioError::fetch("papers", e))?;
    Ok(self.resolve_co_authors(papers).await)
  }

  /// A single paper by identifier.
  pub async fn get(&self, id: &str) -> Result<Paper> {
    let paper = QueryPapers::by_id(id)
      .execute(self.db)
      .await
      .map_err(|e| FolioError::fetch("paper", e))?
      .pop()
      .ok_or_else(|| FolioError::NotFound(format!("paper {id}")))?;
    Ok(self.resolve_one(paper).await)
  }

  /// A single paper, provided `caller` may see it.
  ///
  /// Owners, co-authors and administrators may see a paper.
  ///
  /// # Errors
  ///
  /// - [`FolioError::AuthenticationRequired`] when there is no caller
  /// - [`FolioError::NotFound`] when there is no such paper
  /// - [`FolioError::Forbidden`] when the caller may not see it
  pub async fn get_for(&self, caller: Option<&Identity>, role: Role, id: &str) -> Result<Paper> {
    let caller = authenticated(caller).ok_or(FolioError::AuthenticationRequired)?;
    let paper = self.get(id).await?;
    if !paper.is_visible_to(caller) && !role.is_admin() {
      warn!("{caller} ({role}) tried to read paper {id} owned by {}", paper.owner);
      return Err(FolioError::Forbidden);
    }
    Ok(paper)
  }

  /// Creates a paper owned by `caller`.
  ///
  /// Fields are stored as given; the store only insists on a non-empty title.
  ///
  /// # Errors
  ///
  /// [`FolioError::AuthenticationRequired`] when there is no caller or the caller's identity is
  /// blank. Nothing is written in that case.
  pub async fn create(&self, caller: Option<&Identity>, draft: &PaperDraft) -> Result<Paper> {
    let caller = authenticated(caller).ok_or(FolioError::AuthenticationRequired)?;
    let paper = InsertPaper::new(caller, draft).execute(self.db).await?;
    info!("Created paper {} \"{}\" for {caller}", paper.id, paper.title);
    Ok(self.resolve_one(paper).await)
  }

  /// Replaces every editable field of paper `id`.
  ///
  /// Only the owner or an administrator may do this; the owner never changes.
  ///
  /// # Errors
  ///
  /// - [`FolioError::AuthenticationRequired`] when there is no caller
  /// - [`FolioError::NotFound`] when there is no such paper
  /// - [`FolioError::Forbidden`] when the caller is neither owner nor admin
  pub async fn update(
    &self,
    caller: Option<&Identity>,
    role: Role,
    id: &str,
    draft: &PaperDraft,
  ) -> Result<Paper> {
    let caller = authenticated(caller).ok_or(FolioError::AuthenticationRequired)?;
    let existing = QueryPapers::by_id(id)
      .execute(self.db)
      .await?
      .pop()
      .ok_or_else(|| FolioError::NotFound(format!("paper {id}")))?;
    if !existing.is_editable_by(caller, role) {
      warn!("{caller} ({role}) tried to modify paper {id} owned by {}", existing.owner);
      return Err(FolioError::Forbidden);
    }
    let paper = ReplacePaper::new(id, draft).execute(self.db).await?;
    info!("Updated paper {id}");
    Ok(self.resolve_one(paper).await)
  }

  /// Stores a PDF for `caller` and returns its public URL.
  ///
  /// # Errors
  ///
  /// - [`FolioError::AuthenticationRequired`] when there is no caller
  /// - [`FolioError::Upload`] when the file is rejected or cannot be written
  pub async fn upload_binary(
    &self,
    caller: Option<&Identity>,
    file_name: &str,
    bytes: &[u8],
  ) -> Result<Url> {
    let caller = authenticated(caller).ok_or(FolioError::AuthenticationRequired)?;
    let url = self.storage.put(caller, file_name, bytes).await?;
    info!("Uploaded {file_name} for {caller} to {url}");
    Ok(url)
  }

  /// Attaches resolved co-authors to every paper, keeping paper order.
  async fn resolve_co_authors(&self, papers: Vec<Paper>) -> Vec<Paper> {
    stream::iter(papers)
      .map(|paper| self.resolve_one(paper))
      .buffered(self.resolution_window)
      .collect()
      .await
  }

  /// Attaches resolved co-authors to one paper. Lookup failures leave the list empty.
  async fn resolve_one(&self, mut paper: Paper) -> Paper {
    if paper.co_author_ids.is_empty() {
      paper.co_authors = Vec::new();
      return paper;
    }
    match CoAuthorDirectory::new(self.db).resolve(&paper.co_author_ids).await {
      Ok(refs) => paper.co_authors = refs,
      Err(e) => {
        warn!("Could not resolve co-authors of paper {}: {e}", paper.id);
        paper.co_authors = Vec::new();
      },
    }
    paper
  }
}
