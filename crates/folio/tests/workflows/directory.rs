use super::*;

#[traced_test]
#[tokio::test]
async fn test_emails_are_masked_for_non_admins() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let directory = folio.co_authors();
  directory
    .add(&NewCoAuthor::new("Marie Curie", "marie@uni.example").with_department(Department::Med))
    .await?;
  directory.add(&NewCoAuthor::new("Alan Turing", "alan@uni.example")).await?;

  let masked = directory.list(false).await?;
  let names: Vec<_> = masked.iter().map(|c| c.full_name.as_str()).collect();
  assert_eq!(names, vec!["Alan Turing", "Marie Curie"]);
  assert!(masked.iter().all(|c| c.email == "hidden@restricted"));

  let full = directory.list(true).await?;
  assert_eq!(full[1].email, "marie@uni.example");
  assert_eq!(full[1].department, Some(Department::Med));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_deactivated_entries_still_resolve() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let directory = folio.co_authors();
  let gone = directory.add(&NewCoAuthor::new("Emmy Noether", "emmy@uni.example")).await?;

  let me = Identity::from("teacher-1");
  let draft = PaperDraft::new("Invariants").with_co_authors([gone.id.as_str(), "no-such-id"]);
  folio.papers().create(Some(&me), &draft).await?;
  directory.deactivate(&gone.id).await?;

  assert!(directory.list(true).await?.is_empty());
  let papers = folio.papers().list(&me).await?;
  assert_eq!(papers[0].co_author_ids.len(), 2);
  assert_eq!(papers[0].co_authors.len(), 1);
  assert_eq!(papers[0].co_authors[0].full_name, "Emmy Noether");

  assert!(matches!(directory.deactivate("no-such-id").await, Err(FolioError::NotFound(_))));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_role_resolution() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let roles = folio.roles();
  let dean = Identity::from("dean");

  assert_eq!(roles.resolve(None).await, Role::None);
  assert_eq!(roles.resolve(Some(&dean)).await, Role::Teacher);

  roles.assign(&dean, Role::Admin).await?;
  assert_eq!(roles.resolve(Some(&dean)).await, Role::Admin);

  let catalog = Catalog::new(&folio, Some(dean), RecordingNotifier::new());
  let visible = catalog.co_authors(catalog.role().await.is_admin()).await;
  assert!(visible.is_empty());
  assert!(catalog.notifier().received().is_empty());
  Ok(())
}
