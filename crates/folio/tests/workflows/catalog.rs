use super::*;

#[traced_test]
#[tokio::test]
async fn test_create_filter_and_update() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let ada = folio.co_authors().add(&NewCoAuthor::new("Ada Lovelace", "ada@uni.example")).await?;
  let me = Identity::from("teacher-1");

  let papers = folio.papers();
  papers
    .create(
      Some(&me),
      &PaperDraft::new("Analytical Engines")
        .with_department(Department::Csed)
        .with_status(Status::Published)
        .with_co_authors([ada.id.as_str()])
        .with_upload_date(date(2024, 3, 1))
        .with_publish_date(date(2024, 6, 1)),
    )
    .await?;
  papers
    .create(
      Some(&me),
      &PaperDraft::new("Bridge Loads")
        .with_department(Department::Ced)
        .with_collaborators(["Grace Hopper"])
        .with_keywords(["structures"])
        .with_upload_date(date(2024, 5, 1)),
    )
    .await?;

  let listed = papers.list(&me).await?;
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].title, "Bridge Loads");
  assert_eq!(listed[1].co_authors[0].full_name, "Ada Lovelace");

  // the empty filter is the identity
  assert_eq!(filter::apply(&listed, &FilterSpec::default()), listed);

  // free text reaches resolved co-author names
  let by_name = filter::apply(&listed, &FilterSpec::default().with_query("lovelace"));
  assert_eq!(by_name.len(), 1);
  assert_eq!(by_name[0].title, "Analytical Engines");

  let by_collaborator = filter::apply(&listed, &FilterSpec::default().with_collaborator("grace"));
  assert_eq!(by_collaborator[0].title, "Bridge Loads");

  let by_co_author = filter::apply(&listed, &FilterSpec::default().with_co_author(&ada.id));
  assert_eq!(by_co_author.len(), 1);

  // a draft without a publish date never falls inside a publish range
  let published_2024 = FilterSpec::default()
    .with_publish_range(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)));
  let in_range = filter::apply(&listed, &published_2024);
  assert_eq!(in_range.len(), 1);
  assert_eq!(in_range[0].status, Status::Published);

  let uploaded_in_april =
    FilterSpec::default().with_upload_range(Some(date(2024, 4, 1)), Some(date(2024, 4, 30)));
  assert!(filter::apply(&listed, &uploaded_in_april).is_empty());

  // owners may edit their papers, others may not unless they are admins
  let target = &listed[0];
  let edited = target.to_draft().with_status(Status::InReview);
  let stranger = Identity::from("teacher-2");
  let denied = papers.update(Some(&stranger), Role::Teacher, &target.id, &edited).await;
  assert!(matches!(denied, Err(FolioError::Forbidden)));

  let updated = papers.update(Some(&me), Role::Teacher, &target.id, &edited).await?;
  assert_eq!(updated.status, Status::InReview);
  assert_eq!(updated.owner, me);
  assert_eq!(updated.upload_date, date(2024, 5, 1));

  let admin = Identity::from("dean");
  let by_admin = papers.update(Some(&admin), Role::Admin, &target.id, &edited).await?;
  assert_eq!(by_admin.owner, me);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_anonymous_create_is_rejected_once() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let recorder = RecordingNotifier::new();
  let mut catalog = Catalog::new(&folio, None, &recorder);

  assert!(catalog.create(&PaperDraft::new("Nobody's paper")).await.is_none());

  let received = recorder.take();
  assert_eq!(received.len(), 1);
  assert_eq!(received[0].level, Level::Error);
  assert_eq!(received[0].description, "Please log in to upload papers.");
  assert!(folio.papers().list_all().await?.is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_pdf_upload_attaches_to_paper() -> TestResult<()> {
  let (folio, dir) = create_test_folio().await;
  let me = Identity::from("teacher-1");
  let recorder = RecordingNotifier::new();
  let mut catalog = Catalog::new(&folio, Some(me.clone()), &recorder);

  let url = catalog.upload_pdf("thesis.pdf", b"%PDF-1.7\n%%EOF").await.unwrap();
  assert_eq!(url.scheme(), "file");
  let stored = url.to_file_path().unwrap();
  assert!(stored.starts_with(dir.path()));
  assert!(stored.exists());

  let paper = catalog.create(&PaperDraft::new("Thesis").with_pdf_url(url.as_str())).await.unwrap();
  assert!(paper.has_pdf());

  // not a PDF: reported, nothing stored
  assert!(catalog.upload_pdf("notes.txt", b"plain text").await.is_none());
  assert_eq!(recorder.received().last().map(|n| n.level), Some(Level::Error));
  Ok(())
}
