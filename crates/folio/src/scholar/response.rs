//! Provider payloads and their normalized forms.
//!
//! The author-search response is deserialized leniently: every field is optional and missing
//! values fall back to the defaults the portal displays ("Untitled", empty strings, zero
//! citations).

use serde_json::Value;

use super::*;

/// Raw author-search response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthorResponse {
  /// In-band provider error
  #[serde(default)]
  pub error:    Option<String>,
  /// Profile block
  #[serde(default)]
  pub author:   Option<RawAuthor>,
  /// Listed articles
  #[serde(default)]
  pub articles: Vec<RawArticle>,
  /// Citation summary of the whole profile
  #[serde(default)]
  pub cited_by: Option<RawProfileCitations>,
}

/// Raw profile block.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawAuthor {
  pub name:         Option<String>,
  pub affiliations: Option<String>,
  pub email:        Option<String>,
  pub thumbnail:    Option<String>,
}

/// Raw citation summary of a profile.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawProfileCitations {
  pub table: Option<Value>,
}

/// Raw article entry.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawArticle {
  pub title:       Option<String>,
  pub authors:     Option<String>,
  /// Usually a string, occasionally a number
  pub year:        Option<Value>,
  pub cited_by:    Option<RawArticleCitations>,
  pub link:        Option<String>,
  pub publication: Option<String>,
}

/// Raw per-article citation count.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawArticleCitations {
  pub value: Option<u64>,
}

/// A publication as listed on a Scholar profile.
///
/// `authors` is the comma-joined string the provider returns; it is only split when the
/// publication is staged for import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
  /// Title, `"Untitled"` when the provider has none
  pub title:     String,
  /// Comma-joined author names
  pub authors:   String,
  /// Publication year as listed, possibly empty
  pub year:      String,
  /// Citation count
  pub citations: u64,
  /// Link to the publication on Scholar
  pub link:      Option<String>,
  /// Journal or conference
  pub venue:     String,
}

impl From<RawArticle> for Publication {
  fn from(raw: RawArticle) -> Self {
    let year = match raw.year {
      Some(Value::String(year)) => year,
      Some(Value::Number(year)) => year.to_string(),
      _ => String::new(),
    };
    Publication {
      title: raw.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| "Untitled".to_string()),
      authors: raw.authors.unwrap_or_default(),
      year,
      citations: raw.cited_by.and_then(|c| c.value).unwrap_or(0),
      link: raw.link.filter(|l| !l.is_empty()),
      venue: raw.publication.unwrap_or_default(),
    }
  }
}

/// The profile block of a Scholar author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarAuthor {
  /// Display name
  pub name:         Option<String>,
  /// Affiliation line
  pub affiliations: Option<String>,
  /// Verified email line
  pub email:        Option<String>,
  /// Profile picture URL
  pub thumbnail:    Option<String>,
  /// Citation summary table, as returned by the provider
  pub cited_by:     Option<Value>,
}

impl ScholarAuthor {
  /// Merges the profile block with the profile-wide citation table.
  pub(crate) fn from_raw(raw: Option<RawAuthor>, cited_by: Option<RawProfileCitations>) -> Self {
    let raw = raw.unwrap_or_default();
    ScholarAuthor {
      name:         raw.name,
      affiliations: raw.affiliations,
      email:        raw.email,
      thumbnail:    raw.thumbnail,
      cited_by:     cited_by.and_then(|c| c.table),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_article_defaults() {
    let raw: RawArticle = serde_json::from_str("{}").unwrap();
    let publication = Publication::from(raw);
    assert_eq!(publication.title, "Untitled");
    assert_eq!(publication.citations, 0);
    assert!(publication.year.is_empty());
    assert!(publication.link.is_none());
  }

  #[test]
  fn test_article_fields() {
    let raw: RawArticle = serde_json::from_value(serde_json::json!({
      "title": "Deep Residual Learning",
      "authors": "K He, X Zhang, S Ren, J Sun",
      "year": 2016,
      "cited_by": { "value": 200000 },
      "link": "https://scholar.google.com/citations?view_op=view_citation&citation_for_view=x",
      "publication": "CVPR"
    }))
    .unwrap();
    let publication = Publication::from(raw);
    assert_eq!(publication.year, "2016");
    assert_eq!(publication.citations, 200_000);
    assert_eq!(publication.venue, "CVPR");
    assert_eq!(publication.authors, "K He, X Zhang, S Ren, J Sun");
  }
}
