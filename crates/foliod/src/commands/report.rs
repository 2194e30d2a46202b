//! Administrative reports.

use std::io::Write;

use folio::report::{self, ContentType, ReportFilter, ReportSummary};

use super::*;

/// Export formats
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum Format {
  /// Comma-separated values with a header row
  #[default]
  Csv,
  /// A JSON array of records
  Json,
}

/// Arguments for [`Commands::Report`]
#[derive(Args, Clone)]
pub struct ReportArgs {
  /// Only papers from this department (code or name)
  #[arg(long, value_parser = parse_arg::<Department>)]
  pub department:    Option<Department>,
  /// Only papers with this status
  #[arg(long, value_parser = parse_arg::<Status>)]
  pub status:        Option<Status>,
  /// Only papers whose title contains this text
  #[arg(long)]
  pub title:         Option<String>,
  /// Uploaded on or after (YYYY-MM-DD)
  #[arg(long, value_parser = parse_date)]
  pub uploaded_from: Option<NaiveDate>,
  /// Uploaded on or before
  #[arg(long, value_parser = parse_date)]
  pub uploaded_to:   Option<NaiveDate>,
  /// all, with-pdf or metadata-only
  #[arg(long, value_parser = parse_arg::<ContentType>, default_value = "all")]
  pub content_type:  ContentType,
  /// Output format
  #[arg(long, value_enum, default_value_t)]
  pub format:        Format,
  /// File to write; standard output when absent
  #[arg(long, short)]
  pub output:        Option<PathBuf>,
}

impl ReportArgs {
  /// The filter these flags describe.
  fn filter(&self) -> ReportFilter {
    ReportFilter {
      department:   self.department.into(),
      status:       self.status.into(),
      title:        self.title.clone().unwrap_or_default(),
      upload_from:  self.uploaded_from,
      upload_to:    self.uploaded_to,
      content_type: self.content_type,
    }
  }
}

/// Function for the [`Commands::Report`] in the CLI.
pub async fn report<I: UserInteraction>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  args: ReportArgs,
) -> Result<()> {
  require_admin(folio, caller.as_ref()).await?;
  let papers = report::apply_report_filter(&folio.papers().list_all().await?, &args.filter());
  let bytes = match args.format {
    Format::Csv => report::export_delimited(&papers),
    Format::Json => report::export_structured(&papers)?,
  };

  match &args.output {
    Some(path) => {
      tokio::fs::write(path, &bytes).await?;
      interaction.reply(ResponseContent::Success(&format!(
        "Exported {} papers to {}",
        papers.len(),
        path.display()
      )))
    },
    None => {
      let mut stdout = std::io::stdout().lock();
      stdout.write_all(&bytes)?;
      stdout.flush()?;
      Ok(())
    },
  }
}

/// Function for the [`Commands::Stats`] in the CLI.
pub async fn stats<I: UserInteraction>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
) -> Result<()> {
  require_admin(folio, caller.as_ref()).await?;
  let summary = ReportSummary::from_papers(&folio.papers().list_all().await?);
  interaction.reply(ResponseContent::Summary(&summary))
}
