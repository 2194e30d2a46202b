//! Terminal rendering and prompts.

use console::style;
use dialoguer::{Confirm, Input};
use folio::{
  co_author::CoAuthor,
  notification::{Level, Notification, Notifier},
  report::ReportSummary,
  scholar::Publication,
};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Branch of a listing
pub static ITEM_PREFIX: &str = "├─";
/// Last branch of a listing
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line under a branch
pub static CONTINUE_PREFIX: &str = "│  ";

/// Something a command wants shown.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// One paper in full
  Paper(&'a Paper),
  /// A paper listing
  Papers(&'a [Paper]),
  /// Directory entries
  CoAuthors(&'a [CoAuthor]),
  /// Scholar publications, numbered for selection
  Publications(&'a [Publication]),
  /// Aggregate report counts
  Summary(&'a ReportSummary),
  /// An operation completed
  Success(&'a str),
  /// Neutral information
  Info(&'a str),
  /// Something the user should look at
  Warning(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks for a line of text.
  fn prompt(&self, message: &str) -> Result<String>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
  /// Whether prompts are skipped in favor of their defaults.
  fn accepts_defaults(&self) -> bool { false }
}

/// Interactive terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal {
  /// Answer every prompt with its default instead of asking
  accept_defaults: bool,
}

impl Terminal {
  /// Creates a terminal; with `accept_defaults` no prompt is ever shown.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{PROMPT_PREFIX}{message}"))
        .default(false)
        .wait_for_newline(true)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{PROMPT_PREFIX}{message}"))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn accepts_defaults(&self) -> bool { self.accept_defaults }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Paper(paper) => print_paper(paper),
      ResponseContent::Papers(papers) => print_papers(papers),
      ResponseContent::CoAuthors(entries) => print_co_authors(entries),
      ResponseContent::Publications(publications) => print_publications(publications),
      ResponseContent::Summary(summary) => print_summary(summary),
      ResponseContent::Success(message) => {
        println!("{} {}", style(SUCCESS_PREFIX).green(), style(message).green())
      },
      ResponseContent::Info(message) => {
        println!("{} {}", style(INFO_PREFIX).blue(), style(message).white())
      },
      ResponseContent::Warning(message) => {
        println!("{} {}", style(WARNING_PREFIX).yellow(), style(message).yellow())
      },
    }
    Ok(())
  }
}

impl Notifier for Terminal {
  fn notify(&self, notification: Notification) {
    let Notification { level, title, description } = notification;
    match level {
      Level::Success => println!(
        "{} {}: {}",
        style(SUCCESS_PREFIX).green(),
        style(title).green().bold(),
        description
      ),
      Level::Info => {
        println!("{} {}: {}", style(INFO_PREFIX).blue(), style(title).bold(), description)
      },
      Level::Error => eprintln!(
        "{} {}: {}",
        style(ERROR_PREFIX).red(),
        style(title).red().bold(),
        description
      ),
    }
  }
}

/// Prints one labelled detail line.
fn detail(label: &str, value: impl std::fmt::Display) {
  println!("   {} {}", style(label).green().bold(), value);
}

/// Full paper details.
fn print_paper(paper: &Paper) {
  println!("\n{} {}", style(SUCCESS_PREFIX).green(), style(&paper.title).white().bold());
  detail("ID:", &paper.id);
  if !paper.paper_number.is_empty() {
    detail("Number:", &paper.paper_number);
  }
  detail("Status:", paper.status);
  if let Some(department) = paper.department {
    detail("Department:", department.name());
  }
  if !paper.authors.is_empty() {
    detail("Authors:", paper.authors.join(", "));
  }
  if !paper.collaborators.is_empty() {
    detail("Collaborators:", paper.collaborators.join(", "));
  }
  if !paper.co_authors.is_empty() {
    let names: Vec<_> = paper.co_authors.iter().map(|c| c.full_name.as_str()).collect();
    detail("Co-authors:", names.join(", "));
  }
  if !paper.keywords.is_empty() {
    detail("Keywords:", paper.keywords.join(", "));
  }
  detail("Uploaded:", paper.upload_date);
  if let Some(published) = paper.publish_date {
    detail("Published:", published);
  }
  if let Some(year) = paper.publication_year {
    detail("Year:", year);
  }
  if let Some(url) = &paper.pdf_url {
    detail("PDF:", style(url).blue().underlined());
  }
  if let Some(doi) = &paper.doi {
    detail("DOI:", style(doi).blue().underlined());
  }
  if let Some(source) = &paper.source_url {
    detail("Source:", style(source).blue().underlined());
  }
  detail("Owner:", &paper.owner);
}

/// Two lines per paper.
fn print_papers(papers: &[Paper]) {
  if papers.is_empty() {
    println!("{} No papers found", style(INFO_PREFIX).blue());
    return;
  }
  println!("{} Found {} papers:", style(SUCCESS_PREFIX).green(), papers.len());
  for (i, paper) in papers.iter().enumerate() {
    let (prefix, continued) = if i + 1 == papers.len() {
      (LAST_ITEM_PREFIX, "   ")
    } else {
      (ITEM_PREFIX, CONTINUE_PREFIX)
    };
    println!(
      "{} {} {}",
      style(prefix).dim(),
      style(&paper.title).white().bold(),
      style(format!("[{}]", paper.status)).cyan()
    );
    let department = paper.department.map(|d| d.code()).unwrap_or("-");
    println!(
      "{}{} {} {}",
      style(continued).dim(),
      style(&paper.id).dim(),
      style(department).yellow(),
      paper.upload_date
    );
  }
}

/// One line per entry.
fn print_co_authors(entries: &[CoAuthor]) {
  if entries.is_empty() {
    println!("{} No co-authors found", style(INFO_PREFIX).blue());
    return;
  }
  for (i, entry) in entries.iter().enumerate() {
    let prefix = if i + 1 == entries.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
    let department = entry.department.map(|d| d.code()).unwrap_or("-");
    println!(
      "{} {} <{}> {} {}",
      style(prefix).dim(),
      style(&entry.full_name).white().bold(),
      entry.email,
      style(department).yellow(),
      style(&entry.id).dim()
    );
  }
}

/// Numbered publication list.
fn print_publications(publications: &[Publication]) {
  for (i, publication) in publications.iter().enumerate() {
    let year = if publication.year.is_empty() { "n.d." } else { publication.year.as_str() };
    println!(
      "{:>4} {} {}",
      style(format!("[{i}]")).cyan(),
      style(&publication.title).white().bold(),
      style(format!("({year}, {} citations)", publication.citations)).dim()
    );
    if !publication.authors.is_empty() {
      println!("     {}", publication.authors);
    }
  }
}

/// Counts per status and department.
fn print_summary(summary: &ReportSummary) {
  println!("{} {} papers", style(SUCCESS_PREFIX).green(), summary.total);
  for status in Status::ALL {
    detail(&format!("{status}:"), summary.count(status));
  }
  for (department, count) in &summary.by_department {
    detail(&format!("{department}:"), count);
  }
  if summary.unassigned > 0 {
    detail("unassigned:", summary.unassigned);
  }
  detail("with PDF:", summary.with_pdf);
}
