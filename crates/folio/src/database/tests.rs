use super::*;
use crate::{co_author::NewCoAuthor, paper::PaperDraft, role::Role};

/// Helper function to set up a test database
async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("test.db");
  let db = Database::open(&path).await.unwrap();
  (db, path, dir)
}

#[traced_test]
#[tokio::test]
async fn test_database_creation() {
  let (_db, path, _dir) = setup_test_db().await;

  // Check that file exists
  assert!(path.exists());
}

#[traced_test]
#[tokio::test]
async fn test_in_memory_has_schema() {
  let db = Database::open_in_memory().await.unwrap();
  let tables: Vec<String> = db
    .call(|conn| {
      let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
      let names = stmt.query_map([], |row| row.get(0))?.collect::<rusqlite::Result<_>>()?;
      Ok(names)
    })
    .await
    .unwrap();
  assert_eq!(tables, vec!["co_authors", "papers", "profiles", "user_roles"]);
}

#[traced_test]
#[tokio::test]
async fn test_reopen_keeps_data() {
  let (db, path, _dir) = setup_test_db().await;
  let owner = Identity::from("alice");
  InsertPaper::new(&owner, &PaperDraft::new("Persistent")).execute(&db).await.unwrap();
  drop(db);

  let db = Database::open(&path).await.unwrap();
  let papers = QueryPapers::visible_to(&owner).execute(&db).await.unwrap();
  assert_eq!(papers.len(), 1);
  assert_eq!(papers[0].title, "Persistent");
}

#[traced_test]
#[test]
fn test_default_path() {
  let path = Database::default_path();

  assert!(path.ends_with("folio/folio.db") || path.ends_with("folio\\folio.db"));
  assert!(path
    .parent()
    .unwrap()
    .starts_with(dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))));
}

#[traced_test]
#[tokio::test]
async fn test_insert_assigns_identity_and_defaults() {
  let db = Database::open_in_memory().await.unwrap();
  let owner = Identity::from("alice");
  let draft = PaperDraft::new("Sparse Attention").with_co_authors(["c1", "c2", "c1"]);

  let paper = InsertPaper::new(&owner, &draft).execute(&db).await.unwrap();
  assert!(!paper.id.is_empty());
  assert_eq!(paper.owner, owner);
  assert_eq!(paper.co_author_ids, vec!["c1", "c2"]);
  assert_eq!(paper.upload_date, Utc::now().date_naive());
  assert!(paper.co_authors.is_empty());
}

#[traced_test]
#[tokio::test]
async fn test_empty_title_is_rejected_by_store() {
  let db = Database::open_in_memory().await.unwrap();
  let result = InsertPaper::new(&Identity::from("alice"), &PaperDraft::new("")).execute(&db).await;
  assert!(result.is_err());
}

#[traced_test]
#[tokio::test]
async fn test_visible_to_matches_owner_or_co_author() {
  let db = Database::open_in_memory().await.unwrap();
  let alice = Identity::from("alice");
  let bob = Identity::from("bob");

  InsertPaper::new(&alice, &PaperDraft::new("Alice only")).execute(&db).await.unwrap();
  InsertPaper::new(&alice, &PaperDraft::new("With Bob").with_co_authors(["bob"]))
    .execute(&db)
    .await
    .unwrap();
  InsertPaper::new(&bob, &PaperDraft::new("Bob's own")).execute(&db).await.unwrap();

  let titles = |papers: Vec<Paper>| papers.into_iter().map(|p| p.title).collect::<Vec<_>>();

  let for_bob = titles(QueryPapers::visible_to(&bob).execute(&db).await.unwrap());
  assert_eq!(for_bob, vec!["Bob's own", "With Bob"]);

  let for_alice = titles(QueryPapers::visible_to(&alice).execute(&db).await.unwrap());
  assert_eq!(for_alice, vec!["With Bob", "Alice only"]);

  assert_eq!(QueryPapers::list_all().execute(&db).await.unwrap().len(), 3);
}

#[traced_test]
#[tokio::test]
async fn test_replace_keeps_owner() {
  let db = Database::open_in_memory().await.unwrap();
  let alice = Identity::from("alice");
  let paper = InsertPaper::new(&alice, &PaperDraft::new("Before")).execute(&db).await.unwrap();

  let draft = paper.to_draft();
  let draft = PaperDraft { title: "After".into(), ..draft }.with_status(Status::Published);
  let updated = ReplacePaper::new(&paper.id, &draft).execute(&db).await.unwrap();

  assert_eq!(updated.id, paper.id);
  assert_eq!(updated.owner, alice);
  assert_eq!(updated.title, "After");
  assert_eq!(updated.status, Status::Published);
  assert_eq!(updated.created_at, paper.created_at);
}

#[traced_test]
#[tokio::test]
async fn test_replace_unknown_id_is_not_found() {
  let db = Database::open_in_memory().await.unwrap();
  let result = ReplacePaper::new("missing", &PaperDraft::new("x")).execute(&db).await;
  assert!(matches!(result, Err(FolioError::NotFound(_))));
}

#[traced_test]
#[tokio::test]
async fn test_co_author_queries() {
  let db = Database::open_in_memory().await.unwrap();
  let zoe = InsertCoAuthor::new(&NewCoAuthor::new("Zoe Park", "zoe@example.edu"))
    .execute(&db)
    .await
    .unwrap();
  let adam = InsertCoAuthor::new(
    &NewCoAuthor::new("Adam Roy", "adam@example.edu").with_department(Department::Eced),
  )
  .execute(&db)
  .await
  .unwrap();
  let gone = InsertCoAuthor::new(&NewCoAuthor::new("Gone Author", "gone@example.edu"))
    .execute(&db)
    .await
    .unwrap();
  assert!(SetCoAuthorActive::new(&gone.id, false).execute(&db).await.unwrap());
  assert!(!SetCoAuthorActive::new("missing", false).execute(&db).await.unwrap());

  let active = QueryCoAuthors::active().execute(&db).await.unwrap();
  let names: Vec<_> = active.iter().map(|c| c.full_name.as_str()).collect();
  assert_eq!(names, vec!["Adam Roy", "Zoe Park"]);
  assert_eq!(active[0].department, Some(Department::Eced));

  let ids = [zoe.id.clone(), "unknown".to_string(), adam.id.clone(), gone.id.clone()];
  let resolved = QueryCoAuthors::by_ids(&ids).execute(&db).await.unwrap();
  let resolved: Vec<_> = resolved.iter().map(|c| c.id.clone()).collect();
  assert_eq!(resolved, vec![zoe.id, adam.id, gone.id]);

  let none = QueryCoAuthors::by_ids::<String>(&[]).execute(&db).await.unwrap();
  assert!(none.is_empty());
}

#[traced_test]
#[tokio::test]
async fn test_role_rows() {
  let db = Database::open_in_memory().await.unwrap();
  let carol = Identity::from("carol");
  assert_eq!(GetRole::new(&carol).execute(&db).await.unwrap(), None);

  SetRole::new(&carol, Role::Admin).execute(&db).await.unwrap();
  assert_eq!(GetRole::new(&carol).execute(&db).await.unwrap(), Some(Role::Admin));

  SetRole::new(&carol, Role::None).execute(&db).await.unwrap();
  assert_eq!(GetRole::new(&carol).execute(&db).await.unwrap(), Some(Role::None));
}

#[traced_test]
#[tokio::test]
async fn test_scholar_id_profile() {
  let db = Database::open_in_memory().await.unwrap();
  let dave = Identity::from("dave");
  assert_eq!(GetScholarId::new(&dave).execute(&db).await.unwrap(), None);

  SetScholarId::new(&dave, Some("abcDEF123")).execute(&db).await.unwrap();
  assert_eq!(GetScholarId::new(&dave).execute(&db).await.unwrap().as_deref(), Some("abcDEF123"));

  SetScholarId::new(&dave, None).execute(&db).await.unwrap();
  assert_eq!(GetScholarId::new(&dave).execute(&db).await.unwrap(), None);
}
