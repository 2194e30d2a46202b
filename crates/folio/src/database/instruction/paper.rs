//! Paper instructions: insert, full replacement and queries.
//!
//! Papers are addressed by their system-assigned identifier. Queries always return papers
//! newest first; co-author references are returned as stored and are not resolved here (see
//! [`PaperRepository`](crate::papers::PaperRepository) for enrichment).

use super::*;
use crate::paper::PaperDraft;

/// Inserts a new paper owned by the given identity.
///
/// The identifier and creation timestamp are assigned here. Fields of the draft are stored
/// verbatim, except that repeated co-author references are collapsed and a missing upload date
/// becomes today's date.
#[derive(Debug, Clone)]
pub struct InsertPaper {
  owner: Identity,
  draft: PaperDraft,
}

impl InsertPaper {
  /// Creates an insert of `draft` owned by `owner`.
  pub fn new(owner: &Identity, draft: &PaperDraft) -> Self {
    Self { owner: owner.clone(), draft: draft.clone() }
  }
}

#[async_trait]
impl DatabaseInstruction for InsertPaper {
  type Output = Paper;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let owner = self.owner.clone();
    let draft = self.draft.clone();
    let paper_id = id.clone();

    debug!("Inserting paper {id} for {owner}");
    let paper = db
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT INTO papers (
                id, owner, paper_number, title, collaborators, authors, co_author_ids,
                upload_date, publish_date, status, keywords, pdf_url, department,
                publication_year, source_url, doi, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
             ?17, ?17)",
          )?;
          stmt.execute(params![
            paper_id,
            owner.as_str(),
            draft.paper_number,
            draft.title,
            to_json_list(&draft.collaborators),
            to_json_list(&draft.authors),
            to_json_list(&dedup(&draft.co_author_ids)),
            draft.upload_date.unwrap_or_else(|| now.date_naive()),
            draft.publish_date,
            draft.status.as_str(),
            to_json_list(&draft.keywords),
            draft.pdf_url,
            draft.department.map(|d| d.code()),
            draft.publication_year,
            draft.source_url,
            draft.doi,
            format_timestamp(now),
          ])?;
        }
        let paper = tx.query_row(
          &format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id = ?1"),
          [&paper_id],
          paper_from_row,
        )?;
        tx.commit()?;
        Ok(paper)
      })
      .await?;
    Ok(paper)
  }
}

/// Replaces every caller-editable field of an existing paper.
///
/// The owner, identifier and creation timestamp are never touched. Fails with
/// [`FolioError::NotFound`] when no paper has the identifier.
#[derive(Debug, Clone)]
pub struct ReplacePaper {
  id:    String,
  draft: PaperDraft,
}

impl ReplacePaper {
  /// Creates a replacement of paper `id` with `draft`.
  pub fn new(id: impl Into<String>, draft: &PaperDraft) -> Self {
    Self { id: id.into(), draft: draft.clone() }
  }
}

#[async_trait]
impl DatabaseInstruction for ReplacePaper {
  type Output = Paper;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let id = self.id.clone();
    let draft = self.draft.clone();
    let now = Utc::now();

    let paper = db
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE papers SET
              paper_number = ?2, title = ?3, collaborators = ?4, authors = ?5,
              co_author_ids = ?6, upload_date = COALESCE(?7, upload_date), publish_date = ?8,
              status = ?9, keywords = ?10, pdf_url = ?11, department = ?12,
              publication_year = ?13, source_url = ?14, doi = ?15, updated_at = ?16
           WHERE id = ?1",
          params![
            id,
            draft.paper_number,
            draft.title,
            to_json_list(&draft.collaborators),
            to_json_list(&draft.authors),
            to_json_list(&dedup(&draft.co_author_ids)),
            draft.upload_date,
            draft.publish_date,
            draft.status.as_str(),
            to_json_list(&draft.keywords),
            draft.pdf_url,
            draft.department.map(|d| d.code()),
            draft.publication_year,
            draft.source_url,
            draft.doi,
            format_timestamp(now),
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let paper = tx.query_row(
          &format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id = ?1"),
          [&id],
          paper_from_row,
        )?;
        tx.commit()?;
        Ok(Some(paper))
      })
      .await?;

    paper.ok_or_else(|| FolioError::NotFound(format!("paper {}", self.id)))
  }
}

/// Which papers a [`QueryPapers`] selects.
#[derive(Debug, Clone)]
pub enum PaperCriteria {
  /// Papers the identity owns or is referenced on as a co-author
  VisibleTo(Identity),
  /// A single paper by identifier
  Id(String),
  /// Every paper in the catalog
  All,
}

/// Selects papers, newest first.
#[derive(Debug, Clone)]
pub struct QueryPapers {
  criteria: PaperCriteria,
}

impl QueryPapers {
  /// Creates a query with the given criteria.
  pub fn new(criteria: PaperCriteria) -> Self { Self { criteria } }

  /// Papers where `identity` is the owner or one of the co-author references.
  pub fn visible_to(identity: &Identity) -> Self {
    Self::new(PaperCriteria::VisibleTo(identity.clone()))
  }

  /// The paper with the given identifier, if any.
  pub fn by_id(id: impl Into<String>) -> Self { Self::new(PaperCriteria::Id(id.into())) }

  /// Every paper.
  pub fn list_all() -> Self { Self::new(PaperCriteria::All) }

  /// SQL and its single optional parameter for the criteria.
  fn build_sql(&self) -> (String, Option<String>) {
    let order = "ORDER BY created_at DESC, rowid DESC";
    match &self.criteria {
      PaperCriteria::VisibleTo(identity) => (
        format!(
          "SELECT {PAPER_COLUMNS} FROM papers
           WHERE owner = ?1
              OR EXISTS (SELECT 1 FROM json_each(papers.co_author_ids) WHERE value = ?1)
           {order}"
        ),
        Some(identity.as_str().to_string()),
      ),
      PaperCriteria::Id(id) => {
        (format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id = ?1 {order}"), Some(id.clone()))
      },
      PaperCriteria::All => (format!("SELECT {PAPER_COLUMNS} FROM papers {order}"), None),
    }
  }
}

#[async_trait]
impl DatabaseInstruction for QueryPapers {
  type Output = Vec<Paper>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (sql, param) = self.build_sql();
    trace!("Querying papers: {:?}", self.criteria);
    db.call(move |conn| {
      let mut stmt = conn.prepare_cached(&sql)?;
      let papers = match param {
        Some(param) => stmt.query_map([param], paper_from_row)?.collect::<rusqlite::Result<_>>()?,
        None => stmt.query_map([], paper_from_row)?.collect::<rusqlite::Result<_>>()?,
      };
      Ok(papers)
    })
    .await
  }
}

/// Removes repeated entries, keeping the first occurrence of each.
fn dedup(ids: &[String]) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  ids.iter().filter(|id| seen.insert(id.as_str())).cloned().collect()
}
