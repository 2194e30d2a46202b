//! Administrative reports: filtering, aggregate counts and export.
//!
//! Reports work on any slice of papers, usually [`PaperRepository::list_all`]. Two export
//! formats are produced:
//!
//! - delimited text ([`export_delimited`]): a header row and eight quoted columns per paper
//! - structured JSON ([`export_structured`]): a pretty-printed array of keyed records
//!
//! Both carry the same logical fields. List-valued fields are joined with `"; "` and missing
//! values are written as empty strings. In delimited output an embedded `"` is doubled.
//!
//! [`PaperRepository::list_all`]: crate::papers::PaperRepository::list_all
//!
//! # Examples
//!
//! ```
//! use folio::report::{export_delimited, ReportFilter};
//!
//! let csv = String::from_utf8(export_delimited(&[])).unwrap();
//! assert_eq!(
//!   csv,
//!   "Title,Department,Status,Collaborators,Keywords,Upload Date,Publish Date,DOI\n"
//! );
//! assert!(ReportFilter::default().is_empty());
//! ```

use super::*;
use crate::{
  filter::{contains, within, Selector},
  paper::{Department, Paper, Status},
};

/// Header row of the delimited export.
pub const DELIMITED_HEADER: [&str; 8] = [
  "Title",
  "Department",
  "Status",
  "Collaborators",
  "Keywords",
  "Upload Date",
  "Publish Date",
  "DOI",
];

/// Which papers a report covers with respect to their PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
  /// Every paper
  #[default]
  All,
  /// Only papers with a PDF attached
  WithPdf,
  /// Only papers without a PDF
  MetadataOnly,
}

impl ContentType {
  /// Whether `paper` falls under this content type.
  pub fn matches(&self, paper: &Paper) -> bool {
    match self {
      ContentType::All => true,
      ContentType::WithPdf => paper.has_pdf(),
      ContentType::MetadataOnly => !paper.has_pdf(),
    }
  }
}

impl FromStr for ContentType {
  type Err = FolioError;

  fn from_str(s: &str) -> Result<Self> {
    match &s.trim().to_lowercase() as &str {
      "all" => Ok(ContentType::All),
      "with-pdf" | "pdf" => Ok(ContentType::WithPdf),
      "metadata-only" | "metadata" => Ok(ContentType::MetadataOnly),
      other => Err(FolioError::InvalidInput(format!("unknown content type: {other}"))),
    }
  }
}

/// A conjunctive filter for reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
  /// Required department
  pub department:   Selector<Department>,
  /// Required status
  pub status:       Selector<Status>,
  /// Text the title must contain, case-insensitively
  pub title:        String,
  /// Earliest upload date
  pub upload_from:  Option<NaiveDate>,
  /// Latest upload date
  pub upload_to:    Option<NaiveDate>,
  /// PDF presence
  pub content_type: ContentType,
}

impl ReportFilter {
  /// Whether every clause is vacuous.
  pub fn is_empty(&self) -> bool { self == &ReportFilter::default() }

  /// Whether `paper` satisfies every clause.
  pub fn matches(&self, paper: &Paper) -> bool {
    let title = self.title.trim().to_lowercase();
    self.department.matches_opt(paper.department.as_ref())
      && self.status.matches(&paper.status)
      && (title.is_empty() || contains(&paper.title, &title))
      && within(Some(paper.upload_date), self.upload_from, self.upload_to)
      && self.content_type.matches(paper)
  }
}

/// Papers matching `filter`, in input order.
pub fn apply_report_filter(papers: &[Paper], filter: &ReportFilter) -> Vec<Paper> {
  papers.iter().filter(|p| filter.matches(p)).cloned().collect()
}

/// One exported row; field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
  /// Title
  pub title:         String,
  /// Department display name
  pub department:    String,
  /// Status wire string
  pub status:        String,
  /// Collaborators joined by `"; "`
  pub collaborators: String,
  /// Keywords joined by `"; "`
  pub keywords:      String,
  /// `YYYY-MM-DD`
  pub upload_date:   String,
  /// `YYYY-MM-DD`, or empty
  pub publish_date:  String,
  /// DOI, or the source link when there is no DOI
  pub doi:           String,
}

impl From<&Paper> for ExportRecord {
  fn from(paper: &Paper) -> Self {
    ExportRecord {
      title:         paper.title.clone(),
      department:    paper.department.map(|d| d.name().to_string()).unwrap_or_default(),
      status:        paper.status.to_string(),
      collaborators: paper.collaborators.join("; "),
      keywords:      paper.keywords.join("; "),
      upload_date:   paper.upload_date.format("%Y-%m-%d").to_string(),
      publish_date:  paper
        .publish_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default(),
      doi:           paper.doi.clone().or_else(|| paper.source_url.clone()).unwrap_or_default(),
    }
  }
}

impl ExportRecord {
  /// The fields in column order.
  fn fields(&self) -> [&str; 8] {
    [
      self.title.as_str(),
      self.department.as_str(),
      self.status.as_str(),
      self.collaborators.as_str(),
      self.keywords.as_str(),
      self.upload_date.as_str(),
      self.publish_date.as_str(),
      self.doi.as_str(),
    ]
  }
}

/// Comma-separated export with a header row. Always ends in a newline.
pub fn export_delimited(papers: &[Paper]) -> Vec<u8> {
  let mut out = DELIMITED_HEADER.join(",");
  out.push('\n');
  for paper in papers {
    let record = ExportRecord::from(paper);
    let row: Vec<String> =
      record.fields().iter().map(|field| format!("\"{}\"", field.replace('"', "\"\""))).collect();
    out.push_str(&row.join(","));
    out.push('\n');
  }
  debug!("Exported {} papers as delimited text", papers.len());
  out.into_bytes()
}

/// Pretty-printed JSON array with one keyed record per paper.
pub fn export_structured(papers: &[Paper]) -> Result<Vec<u8>> {
  let records: Vec<ExportRecord> = papers.iter().map(ExportRecord::from).collect();
  let json = serde_json::to_vec_pretty(&records)?;
  debug!("Exported {} papers as JSON", papers.len());
  Ok(json)
}

/// Aggregate counts over a set of papers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
  /// Number of papers
  pub total:         usize,
  /// Count per status wire string; every status is present
  pub by_status:     BTreeMap<String, usize>,
  /// Count per department code; departments without papers are absent
  pub by_department: BTreeMap<String, usize>,
  /// Papers without a department
  pub unassigned:    usize,
  /// Papers with a PDF attached
  pub with_pdf:      usize,
}

impl ReportSummary {
  /// Counts `papers`.
  pub fn from_papers(papers: &[Paper]) -> Self {
    let mut summary = ReportSummary {
      total: papers.len(),
      by_status: Status::ALL.iter().map(|s| (s.to_string(), 0)).collect(),
      ..Default::default()
    };
    for paper in papers {
      *summary.by_status.entry(paper.status.to_string()).or_default() += 1;
      match paper.department {
        Some(department) => {
          *summary.by_department.entry(department.code().to_string()).or_default() += 1
        },
        None => summary.unassigned += 1,
      }
      if paper.has_pdf() {
        summary.with_pdf += 1;
      }
    }
    summary
  }

  /// Count for one status.
  pub fn count(&self, status: Status) -> usize {
    self.by_status.get(status.as_str()).copied().unwrap_or(0)
  }
}
