use mockito::{Matcher, Server};
use url::Url;

use super::*;

const PROFILE: &str = r#"{
  "search_metadata": { "status": "Success" },
  "author": { "name": "Grace Hopper", "affiliations": "Navy" },
  "articles": [
    {
      "title": "Compiling Routines",
      "authors": "G Hopper, R Cobol",
      "year": "1952",
      "link": "https://scholar.example/compiling",
      "publication": "ACM",
      "cited_by": { "value": 812 }
    },
    { "title": "Debugging", "authors": "G Hopper", "year": "" }
  ]
}"#;

#[traced_test]
#[tokio::test]
async fn test_fetch_stage_and_commit() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("GET", "/search.json")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("engine".into(), "google_scholar_author".into()),
      Matcher::UrlEncoded("author_id".into(), "JicYPdAAAAAJ".into()),
      Matcher::UrlEncoded("api_key".into(), "test-key".into()),
    ]))
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(PROFILE)
    .create_async()
    .await;

  let endpoint = Url::parse(&format!("{}/search.json", server.url()))?;
  let client = ScholarClient::new(endpoint, "test-key");
  let fetched = client
    .fetch_publications("https://scholar.google.com/citations?user=JicYPdAAAAAJ&hl=en")
    .await?;
  mock.assert_async().await;
  assert_eq!(fetched.scholar_id, "JicYPdAAAAAJ");
  assert_eq!(fetched.message, "Found 2 publications");
  assert_eq!(fetched.publications[0].citations, 812);

  let drafts = scholar::stage_for_import(&[0], &fetched.publications);
  assert_eq!(drafts[0].authors, vec!["G Hopper", "R Cobol"]);
  assert_eq!(drafts[0].publication_year, Some(1952));

  let (folio, _dir) = create_test_folio().await;
  let me = Identity::from("teacher-1");
  let recorder = RecordingNotifier::new();
  let mut catalog = Catalog::new(&folio, Some(me), &recorder);
  assert_eq!(catalog.import(&scholar::stage_all(&fetched.publications)).await, 2);

  let received = recorder.take();
  assert_eq!(received.len(), 1);
  assert_eq!(received[0].title, "Success");
  assert_eq!(received[0].description, "Imported 2 publications as drafts");
  assert_eq!(catalog.papers().len(), 2);
  assert!(catalog.papers().iter().all(|p| p.status == Status::Draft));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_empty_profile_is_not_an_error() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/search.json")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(r#"{ "author": { "name": "Nobody" } }"#)
    .create_async()
    .await;

  let client = ScholarClient::new(Url::parse(&format!("{}/search.json", server.url()))?, "k");
  let fetched = client.fetch_publications("AAAAAAAAAAAA").await?;
  assert!(fetched.is_empty());
  assert_eq!(fetched.message, scholar::NO_RESULTS_MESSAGE);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_linked_scholar_id() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let me = Identity::from("teacher-1");
  folio.profiles().set_scholar_id(&me, "JicYPdAAAAAJ").await?;
  assert_eq!(folio.profiles().scholar_id(&me).await?.as_deref(), Some("JicYPdAAAAAJ"));
  Ok(())
}
