//! A caller's working view of the catalog.
//!
//! A [`Catalog`] holds the paper collection one view works with, for one caller. Its
//! operations never return errors: each outcome is reported through the [`Notifier`] and the
//! collection is only changed on success. This is the layer a front end drives.
//!
//! Catalogs share nothing. Two catalogs for the same caller fetch and filter independently,
//! and nothing deduplicates concurrent creates.
//!
//! ```no_run
//! use folio::{
//!   filter::FilterSpec,
//!   notification::TracingNotifier,
//!   paper::{Identity, PaperDraft},
//!   session::Catalog,
//!   Folio,
//! };
//!
//! # async fn example(folio: &Folio) {
//! let mut catalog = Catalog::new(folio, Some(Identity::from("teacher-42")), TracingNotifier);
//! catalog.refresh().await;
//! catalog.create(&PaperDraft::new("Notes on Sheaves")).await;
//! let hits = catalog.filtered(&FilterSpec::default().with_query("sheaves"));
//! # }
//! ```

use super::*;
use crate::{
  co_author::CoAuthor,
  filter::{self, FilterSpec},
  notification::{Notification, Notifier},
  paper::{Paper, PaperDraft},
  role::Role,
  scholar::commit_import,
};

/// One caller's paper collection plus the notifier its outcomes go to.
#[derive(Debug)]
pub struct Catalog<'a, N: Notifier> {
  /// Backing handle
  folio:    &'a Folio,
  /// Authenticated caller, if any
  caller:   Option<Identity>,
  /// Where outcomes are reported
  notifier: N,
  /// Papers as of the last successful refresh, newest first
  papers:   Vec<Paper>,
}

impl<'a, N: Notifier> Catalog<'a, N> {
  /// Creates an empty catalog. A blank caller is treated as no caller.
  pub fn new(folio: &'a Folio, caller: Option<Identity>, notifier: N) -> Self {
    let caller = caller.filter(|caller| !caller.is_blank());
    Self { folio, caller, notifier, papers: Vec::new() }
  }

  /// The caller this catalog serves.
  pub fn caller(&self) -> Option<&Identity> { self.caller.as_ref() }

  /// The current collection.
  pub fn papers(&self) -> &[Paper] { &self.papers }

  /// The notifier outcomes are reported to.
  pub fn notifier(&self) -> &N { &self.notifier }

  /// Reloads the collection. On failure the previous collection is kept and an error is
  /// reported. Returns whether the reload succeeded.
  ///
  /// Without a caller there is nothing to load; the collection is left as is.
  pub async fn refresh(&mut self) -> bool {
    let Some(caller) = &self.caller else {
      return false;
    };
    match self.folio.papers().list(caller).await {
      Ok(papers) => {
        self.papers = papers;
        true
      },
      Err(e) => {
        self.notifier.notify(Notification::error("Failed to load papers", e.to_string()));
        false
      },
    }
  }

  /// Reloads every paper in the catalog instead of only the caller's.
  pub async fn refresh_all(&mut self) -> bool {
    match self.folio.papers().list_all().await {
      Ok(papers) => {
        self.papers = papers;
        true
      },
      Err(e) => {
        self.notifier.notify(Notification::error("Failed to load papers", e.to_string()));
        false
      },
    }
  }

  /// Creates a paper and puts it at the front of the collection.
  ///
  /// Exactly one notification is reported, whatever the outcome.
  pub async fn create(&mut self, draft: &PaperDraft) -> Option<Paper> {
    match self.folio.papers().create(self.caller.as_ref(), draft).await {
      Ok(paper) => {
        self.papers.insert(0, paper.clone());
        self.notifier.notify(Notification::success(
          "Paper uploaded",
          "Your research paper has been successfully uploaded.",
        ));
        Some(paper)
      },
      Err(FolioError::AuthenticationRequired) => {
        let notification =
          Notification::error("Authentication required", "Please log in to upload papers.");
        self.notifier.notify(notification);
        None
      },
      Err(e) => {
        self.notifier.notify(Notification::error("Upload failed", e.to_string()));
        None
      },
    }
  }

  /// Replaces a paper's contents, updating it in place in the collection.
  pub async fn update(&mut self, id: &str, draft: &PaperDraft) -> Option<Paper> {
    let role = self.role().await;
    match self.folio.papers().update(self.caller.as_ref(), role, id, draft).await {
      Ok(paper) => {
        if let Some(slot) = self.papers.iter_mut().find(|p| p.id == paper.id) {
          *slot = paper.clone();
        }
        self.notifier.notify(Notification::success("Paper updated", paper.title.clone()));
        Some(paper)
      },
      Err(e) => {
        self.notifier.notify(Notification::from_error(&e));
        None
      },
    }
  }

  /// Uploads a PDF for the caller and returns its public URL.
  pub async fn upload_pdf(&self, file_name: &str, bytes: &[u8]) -> Option<Url> {
    match self.folio.papers().upload_binary(self.caller.as_ref(), file_name, bytes).await {
      Ok(url) => Some(url),
      Err(e) => {
        self.notifier.notify(Notification::from_error(&e));
        None
      },
    }
  }

  /// Stores imported drafts for the caller, then reloads. Returns how many were stored.
  pub async fn import(&mut self, drafts: &[PaperDraft]) -> usize {
    let committed = commit_import(&self.folio.papers(), drafts, self.caller.as_ref()).await;
    match committed {
      Ok(count) => {
        let description = format!("Imported {count} publications as drafts");
        self.notifier.notify(Notification::success("Success", description));
        self.refresh().await;
        count
      },
      Err(e) => {
        self.notifier.notify(Notification::from_error(&e));
        0
      },
    }
  }

  /// The co-author directory as this caller may see it. Empty on failure.
  pub async fn co_authors(&self, caller_is_admin: bool) -> Vec<CoAuthor> {
    match self.folio.co_authors().list(caller_is_admin).await {
      Ok(entries) => entries,
      Err(e) => {
        self.notifier.notify(Notification::error("Failed to load co-authors", e.to_string()));
        Vec::new()
      },
    }
  }

  /// The caller's role, read fresh.
  pub async fn role(&self) -> Role { self.folio.roles().resolve(self.caller.as_ref()).await }

  /// The collection narrowed by `spec`.
  pub fn filtered(&self, spec: &FilterSpec) -> Vec<Paper> { filter::apply(&self.papers, spec) }

  /// The caller's own papers whose title or a keyword contains `query`.
  pub fn search_mine(&self, query: &str) -> Vec<Paper> {
    match &self.caller {
      Some(caller) => filter::quick_search(&filter::owned_by(&self.papers, caller), query),
      None => Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::notification::{Level, RecordingNotifier};

  async fn folio(dir: &tempfile::TempDir) -> Folio {
    let config = Config::default()
      .with_database_path(&dir.path().join("folio.db"))
      .with_storage_path(&dir.path().join("papers"));
    Folio::builder().with_config(config).build().await.unwrap()
  }

  #[traced_test]
  #[tokio::test]
  async fn test_create_without_caller_notifies_once() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let recorder = RecordingNotifier::new();
    let mut catalog = Catalog::new(&folio, None, &recorder);

    assert!(catalog.create(&PaperDraft::new("Anonymous")).await.is_none());
    let received = recorder.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, Level::Error);
    assert_eq!(received[0].title, "Authentication required");
    assert!(catalog.papers().is_empty());
    assert!(folio.papers().list_all().await.unwrap().is_empty());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_create_prepends_and_notifies() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let recorder = RecordingNotifier::new();
    let mut catalog = Catalog::new(&folio, Some(Identity::from("me")), &recorder);

    catalog.create(&PaperDraft::new("First")).await.unwrap();
    catalog.create(&PaperDraft::new("Second")).await.unwrap();
    let titles: Vec<_> = catalog.papers().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Second", "First"]);
    assert!(recorder.received().iter().all(|n| n.level == Level::Success));

    // a store rejection is one error notification and no state change
    assert!(catalog.create(&PaperDraft::new("")).await.is_none());
    assert_eq!(recorder.received().last().unwrap().title, "Upload failed");
    assert_eq!(catalog.papers().len(), 2);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_refresh_and_search_mine() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let me = Identity::from("me");
    let papers = folio.papers();
    papers.create(Some(&me), &PaperDraft::new("Mine").with_keywords(["optics"])).await.unwrap();
    let shared = PaperDraft::new("Shared optics").with_co_authors(["me"]);
    papers.create(Some(&Identity::from("friend")), &shared).await.unwrap();

    let mut catalog = Catalog::new(&folio, Some(me), RecordingNotifier::new());
    assert!(catalog.refresh().await);
    assert_eq!(catalog.papers().len(), 2);
    let mine = catalog.search_mine("optics");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Mine");
    assert!(catalog.notifier().received().is_empty());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_import_reports_committed_count() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let recorder = RecordingNotifier::new();
    let mut catalog = Catalog::new(&folio, Some(Identity::from("me")), &recorder);

    let drafts = [PaperDraft::new("One"), PaperDraft::new(""), PaperDraft::new("Two")];
    assert_eq!(catalog.import(&drafts).await, 2);
    assert_eq!(catalog.papers().len(), 2);
    let received = recorder.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].description, "Imported 2 publications as drafts");
  }

  /// Drops `table`, so every later read of it fails.
  async fn drop_table(folio: &Folio, table: &'static str) {
    folio
      .database
      .call(move |conn| {
        conn.execute_batch(&format!("DROP TABLE {table}"))?;
        Ok(())
      })
      .await
      .unwrap();
  }

  #[traced_test]
  #[tokio::test]
  async fn test_failed_refresh_keeps_collection() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let me = Identity::from("me");
    folio.papers().create(Some(&me), &PaperDraft::new("Kept")).await.unwrap();

    let recorder = RecordingNotifier::new();
    let mut catalog = Catalog::new(&folio, Some(me), &recorder);
    assert!(catalog.refresh().await);
    assert!(recorder.received().is_empty());

    drop_table(&folio, "papers").await;
    assert!(!catalog.refresh().await);
    assert_eq!(catalog.papers().len(), 1);
    assert_eq!(catalog.papers()[0].title, "Kept");
    let received = recorder.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, Level::Error);
    assert_eq!(received[0].title, "Failed to load papers");

    assert!(!catalog.refresh_all().await);
    assert_eq!(catalog.papers().len(), 1);
    assert_eq!(recorder.received().len(), 2);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_failed_co_author_load_is_empty() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let recorder = RecordingNotifier::new();
    let catalog = Catalog::new(&folio, Some(Identity::from("me")), &recorder);

    drop_table(&folio, "co_authors").await;
    assert!(catalog.co_authors(true).await.is_empty());
    let received = recorder.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, Level::Error);
    assert_eq!(received[0].title, "Failed to load co-authors");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_blank_caller_is_anonymous() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let recorder = RecordingNotifier::new();
    let mut catalog = Catalog::new(&folio, Some(Identity::from("")), &recorder);

    assert!(catalog.caller().is_none());
    assert!(catalog.create(&PaperDraft::new("Blank")).await.is_none());
    assert_eq!(recorder.received()[0].title, "Authentication required");
    assert!(catalog.upload_pdf("a.pdf", b"%PDF-1.4").await.is_none());
    assert!(!dir.path().join("papers").read_dir().unwrap().any(|_| true));
    assert_eq!(catalog.role().await, Role::None);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_role_defaults_to_teacher() {
    let dir = tempdir().unwrap();
    let folio = folio(&dir).await;
    let catalog = Catalog::new(&folio, Some(Identity::from("new")), RecordingNotifier::new());
    assert_eq!(catalog.role().await, Role::Teacher);
  }
}
