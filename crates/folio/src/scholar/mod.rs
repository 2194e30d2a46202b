//! Google Scholar import.
//!
//! Publications are pulled from a Scholar author profile through SerpAPI's
//! `google_scholar_author` engine, staged as draft papers, and committed one at a time.
//!
//! The flow has three steps:
//! 1. [`ScholarClient::fetch_publications`] lists the publications on a profile
//! 2. [`stage_for_import`] turns the selected ones into draft papers
//! 3. [`commit_import`] stores the drafts, skipping any that fail
//!
//! The API key is read from the environment variable named in
//! [`ScholarConfig::api_key_env`](crate::config::ScholarConfig::api_key_env) (`SERPAPI_API_KEY`
//! by default). A missing key is a configuration error, not something to retry.
//!
//! # Examples
//!
//! ```no_run
//! use folio::{
//!   paper::Identity,
//!   scholar::{commit_import, stage_for_import, ScholarClient},
//!   Folio,
//! };
//!
//! # async fn example(folio: &Folio) -> Result<(), Box<dyn std::error::Error>> {
//! let client = ScholarClient::from_config(&folio.config)?;
//! let fetched = client.fetch_publications("JicYPdAAAAAJ").await?;
//! println!("{}", fetched.message);
//!
//! let drafts = stage_for_import(&[0, 2], &fetched.publications);
//! let me = Identity::from("teacher-42");
//! let imported = commit_import(&folio.papers(), &drafts, Some(&me)).await?;
//! println!("Imported {imported} publications");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use super::*;

mod import;
mod response;

pub use self::{import::*, response::*};
use self::response::AuthorResponse;

/// Message reported when a profile lists no publications.
pub const NO_RESULTS_MESSAGE: &str =
  "No publications found. The profile may be private or the ID may be incorrect.";

lazy_static! {
  /// A Scholar user ID inside a profile URL.
  static ref PROFILE_URL_ID: Regex = Regex::new(r"[?&]user=([A-Za-z0-9_-]+)").unwrap();
  /// A bare Scholar user ID.
  static ref BARE_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Extracts a Scholar user ID from a bare ID or a profile URL.
///
/// ```
/// use folio::scholar::normalize_author_id;
///
/// assert_eq!(normalize_author_id(" JicYPdAAAAAJ ").as_deref(), Some("JicYPdAAAAAJ"));
/// assert_eq!(
///   normalize_author_id("https://scholar.google.com/citations?hl=en&user=JicYPdAAAAAJ").as_deref(),
///   Some("JicYPdAAAAAJ")
/// );
/// assert_eq!(normalize_author_id("two words"), None);
/// ```
pub fn normalize_author_id(input: &str) -> Option<String> {
  let input = input.trim();
  if let Some(caps) = PROFILE_URL_ID.captures(input) {
    return caps.get(1).map(|m| m.as_str().to_string());
  }
  BARE_ID.is_match(input).then(|| input.to_string())
}

/// Public profile page of a Scholar user.
pub fn profile_url(scholar_id: &str) -> String {
  format!("https://scholar.google.com/citations?user={scholar_id}")
}

/// Result of a successful publication fetch.
///
/// An empty publication list is still a success; [`ScholarFetch::is_empty`] tells the two
/// apart and [`ScholarFetch::message`] says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarFetch {
  /// The ID that was fetched
  pub scholar_id:   String,
  /// Profile block
  pub author:       ScholarAuthor,
  /// Link to the public profile
  pub profile_url:  String,
  /// Normalized publications, in provider order
  pub publications: Vec<Publication>,
  /// Human-readable outcome
  pub message:      String,
}

impl ScholarFetch {
  /// Whether the profile listed no publications.
  pub fn is_empty(&self) -> bool { self.publications.is_empty() }
}

/// Client for the Scholar author-search provider.
#[derive(Debug, Clone)]
pub struct ScholarClient {
  /// HTTP client, carrying the request timeout
  client:      reqwest::Client,
  /// Search endpoint
  base_url:    Url,
  /// Provider API key
  api_key:     String,
  /// Upper bound on publications per request
  max_results: u32,
}

impl ScholarClient {
  /// Creates a client for the given endpoint and key.
  pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
    Self { client: reqwest::Client::new(), base_url, api_key: api_key.into(), max_results: 100 }
  }

  /// Creates a client from configuration, reading the API key from the environment.
  ///
  /// # Errors
  ///
  /// [`FolioError::Config`] when the key variable is unset or empty, or the endpoint is not a
  /// valid URL.
  pub fn from_config(config: &Config) -> Result<Self> {
    let settings = &config.scholar;
    let api_key = std::env::var(&settings.api_key_env)
      .ok()
      .filter(|key| !key.trim().is_empty())
      .ok_or_else(|| {
        FolioError::Config(format!("SerpAPI key not configured: set {}", settings.api_key_env))
      })?;
    let base_url = Url::parse(&settings.base_url).map_err(|e| {
      FolioError::Config(format!("invalid Scholar endpoint {:?}: {e}", settings.base_url))
    })?;
    let client =
      reqwest::Client::builder().timeout(Duration::from_secs(settings.timeout_secs)).build()?;
    Ok(Self { client, base_url, api_key, max_results: settings.max_results })
  }

  /// Lists the publications on a Scholar profile.
  ///
  /// `author_id` may be a bare ID or a profile URL. One request is made; there is no retry.
  ///
  /// # Errors
  ///
  /// - [`FolioError::InvalidInput`] for a blank or malformed ID
  /// - [`FolioError::ImportProvider`] with the provider's message when it answers with a
  ///   non-success status or an in-band error
  /// - [`FolioError::Network`] when the provider cannot be reached
  pub async fn fetch_publications(&self, author_id: &str) -> Result<ScholarFetch> {
    if author_id.trim().is_empty() {
      return Err(FolioError::InvalidInput("Please enter a Google Scholar ID".into()));
    }
    let scholar_id = normalize_author_id(author_id).ok_or_else(|| {
      FolioError::InvalidInput(format!("not a Google Scholar ID: {author_id:?}"))
    })?;

    let mut url = self.base_url.clone();
    url
      .query_pairs_mut()
      .append_pair("engine", "google_scholar_author")
      .append_pair("author_id", &scholar_id)
      .append_pair("api_key", &self.api_key)
      .append_pair("num", &self.max_results.to_string());

    debug!("Fetching Google Scholar profile {scholar_id}");
    let response = self.client.get(url).send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    trace!("Scholar response ({status}): {}", String::from_utf8_lossy(&body));

    if !status.is_success() {
      let message = serde_json::from_slice::<AuthorResponse>(&body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_else(|| format!("{status}: {}", String::from_utf8_lossy(&body).trim()));
      return Err(FolioError::ImportProvider(message));
    }

    let parsed: AuthorResponse = serde_json::from_slice(&body)?;
    if let Some(error) = parsed.error {
      return Err(FolioError::ImportProvider(error));
    }

    let publications: Vec<Publication> = parsed.articles.into_iter().map(Into::into).collect();
    let author = ScholarAuthor::from_raw(parsed.author, parsed.cited_by);
    let message = if publications.is_empty() {
      NO_RESULTS_MESSAGE.to_string()
    } else {
      format!("Found {} publications", publications.len())
    };
    info!(
      "Found {} publications for {}",
      publications.len(),
      author.name.as_deref().unwrap_or(&scholar_id)
    );

    Ok(ScholarFetch {
      profile_url: profile_url(&scholar_id),
      scholar_id,
      author,
      publications,
      message,
    })
  }
}

#[cfg(test)]
mod tests {
  use mockito::{Matcher, Server};
  use serde_json::json;

  use super::*;

  fn client_for(server: &Server) -> ScholarClient {
    let base = Url::parse(&format!("{}/search.json", server.url())).unwrap();
    ScholarClient::new(base, "test-key")
  }

  fn query_for(author_id: &str) -> Matcher {
    Matcher::AllOf(vec![
      Matcher::UrlEncoded("engine".into(), "google_scholar_author".into()),
      Matcher::UrlEncoded("author_id".into(), author_id.into()),
      Matcher::UrlEncoded("api_key".into(), "test-key".into()),
      Matcher::UrlEncoded("num".into(), "100".into()),
    ])
  }

  #[traced_test]
  #[tokio::test]
  async fn test_fetch_normalizes_articles() {
    let mut server = Server::new_async().await;
    let body = json!({
      "author": {
        "name": "Grace Hopper",
        "affiliations": "Yale University",
        "email": "Verified email at yale.edu",
        "thumbnail": "https://scholar.example/photo.jpg"
      },
      "articles": [
        {
          "title": "The Education of a Computer",
          "authors": "GM Hopper",
          "publication": "Proceedings of the 1952 ACM national meeting",
          "year": "1952",
          "cited_by": { "value": 321 },
          "link": "https://scholar.example/a1"
        },
        { "authors": "GM Hopper, JW Mauchly", "year": "" }
      ],
      "cited_by": { "table": [{ "citations": { "all": 1000 } }] }
    });
    let mock = server
      .mock("GET", "/search.json")
      .match_query(query_for("hopperID_01"))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(body.to_string())
      .create_async()
      .await;

    let fetched = client_for(&server).fetch_publications("hopperID_01").await.unwrap();
    mock.assert_async().await;

    assert_eq!(fetched.publications.len(), 2);
    assert_eq!(fetched.publications[0].citations, 321);
    assert_eq!(fetched.publications[0].venue, "Proceedings of the 1952 ACM national meeting");
    assert_eq!(fetched.publications[1].title, "Untitled");
    assert_eq!(fetched.publications[1].citations, 0);
    assert_eq!(fetched.author.name.as_deref(), Some("Grace Hopper"));
    assert!(fetched.author.cited_by.is_some());
    assert_eq!(fetched.profile_url, "https://scholar.google.com/citations?user=hopperID_01");
    assert_eq!(fetched.message, "Found 2 publications");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_zero_articles_is_empty_success() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/search.json")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(json!({ "author": { "name": "Nobody" } }).to_string())
      .create_async()
      .await;

    let fetched = client_for(&server).fetch_publications("emptyProfile").await.unwrap();
    assert!(fetched.is_empty());
    assert_eq!(fetched.message, NO_RESULTS_MESSAGE);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_in_band_error_is_passed_through() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/search.json")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(json!({ "error": "Invalid API key." }).to_string())
      .create_async()
      .await;

    let result = client_for(&server).fetch_publications("someone").await;
    match result {
      Err(FolioError::ImportProvider(message)) => assert_eq!(message, "Invalid API key."),
      other => panic!("expected a provider error, got {other:?}"),
    }
  }

  #[traced_test]
  #[tokio::test]
  async fn test_http_failure_is_provider_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/search.json")
      .match_query(Matcher::Any)
      .with_status(503)
      .with_body("upstream unavailable")
      .create_async()
      .await;

    let result = client_for(&server).fetch_publications("someone").await;
    match result {
      Err(FolioError::ImportProvider(message)) => assert!(message.contains("upstream unavailable")),
      other => panic!("expected a provider error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_blank_id_is_rejected_without_request() {
    let client = ScholarClient::new(Url::parse("http://127.0.0.1:9/search.json").unwrap(), "k");
    assert!(matches!(client.fetch_publications("  ").await, Err(FolioError::InvalidInput(_))));
  }

  #[test]
  fn test_missing_key_is_config_error() {
    let config = Config::default().with_scholar_api_key_env("FOLIO_TEST_UNSET_SERPAPI_KEY");
    assert!(matches!(ScholarClient::from_config(&config), Err(FolioError::Config(_))));
  }
}
