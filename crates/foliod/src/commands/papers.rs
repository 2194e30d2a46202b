//! Listing, showing, uploading and editing papers.

use folio::filter::FilterSpec;

use super::*;

/// Arguments for [`Commands::List`]
#[derive(Args, Clone, Default)]
pub struct ListArgs {
  /// Every paper in the catalog instead of only yours (admins only)
  #[arg(long)]
  pub all:            bool,
  /// Free text matched against titles, keywords, collaborators and co-author names
  #[arg(long, short)]
  pub query:          Option<String>,
  /// Only papers with this status (draft, in-review, published)
  #[arg(long, value_parser = parse_arg::<Status>)]
  pub status:         Option<Status>,
  /// Only papers with a matching collaborator
  #[arg(long)]
  pub collaborator:   Option<String>,
  /// Only papers from this department (code or name)
  #[arg(long, value_parser = parse_arg::<Department>)]
  pub department:     Option<Department>,
  /// Only papers referencing this co-author ID
  #[arg(long)]
  pub co_author:      Option<String>,
  /// Uploaded on or after (YYYY-MM-DD)
  #[arg(long, value_parser = parse_date)]
  pub uploaded_from:  Option<NaiveDate>,
  /// Uploaded on or before
  #[arg(long, value_parser = parse_date)]
  pub uploaded_to:    Option<NaiveDate>,
  /// Published on or after
  #[arg(long, value_parser = parse_date)]
  pub published_from: Option<NaiveDate>,
  /// Published on or before
  #[arg(long, value_parser = parse_date)]
  pub published_to:   Option<NaiveDate>,
}

impl ListArgs {
  /// The filter these flags describe.
  pub fn filter(&self) -> FilterSpec {
    let mut spec = FilterSpec::default()
      .with_upload_range(self.uploaded_from, self.uploaded_to)
      .with_publish_range(self.published_from, self.published_to);
    if let Some(query) = &self.query {
      spec = spec.with_query(query);
    }
    if let Some(status) = self.status {
      spec = spec.with_status(status);
    }
    if let Some(collaborator) = &self.collaborator {
      spec = spec.with_collaborator(collaborator);
    }
    if let Some(department) = self.department {
      spec = spec.with_department(department);
    }
    if let Some(id) = &self.co_author {
      spec = spec.with_co_author(id);
    }
    spec
  }
}

/// Paper contents shared by [`UploadArgs`] and [`UpdateArgs`]
#[derive(Args, Clone, Default)]
pub struct PaperFields {
  /// Your number for the paper
  #[arg(long)]
  pub number:        Option<String>,
  /// Publication status (draft, in-review, published)
  #[arg(long, value_parser = parse_arg::<Status>)]
  pub status:        Option<Status>,
  /// Department code or name
  #[arg(long, value_parser = parse_arg::<Department>)]
  pub department:    Option<Department>,
  /// External collaborator; repeat or separate with commas
  #[arg(long = "collaborator", value_delimiter = ',')]
  pub collaborators: Vec<String>,
  /// Search keyword; repeat or separate with commas
  #[arg(long = "keyword", value_delimiter = ',')]
  pub keywords:      Vec<String>,
  /// Co-author directory ID; repeat or separate with commas
  #[arg(long = "co-author", value_delimiter = ',')]
  pub co_authors:    Vec<String>,
  /// Upload day (YYYY-MM-DD), today when absent
  #[arg(long, value_parser = parse_date)]
  pub upload_date:   Option<NaiveDate>,
  /// Publication day (YYYY-MM-DD)
  #[arg(long, value_parser = parse_date)]
  pub publish_date:  Option<NaiveDate>,
  /// Digital Object Identifier
  #[arg(long)]
  pub doi:           Option<String>,
  /// Link to the paper elsewhere
  #[arg(long)]
  pub source_url:    Option<String>,
  /// PDF to upload and attach
  #[arg(long)]
  pub pdf:           Option<PathBuf>,
}

impl PaperFields {
  /// Overwrites the fields of `draft` that were given on the command line.
  fn apply(&self, draft: &mut PaperDraft) {
    let trimmed = |values: &[String]| -> Vec<String> {
      values.iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect()
    };
    if let Some(number) = &self.number {
      draft.paper_number = number.clone();
    }
    if let Some(status) = self.status {
      draft.status = status;
    }
    if self.department.is_some() {
      draft.department = self.department;
    }
    if !self.collaborators.is_empty() {
      draft.collaborators = trimmed(&self.collaborators);
    }
    if !self.keywords.is_empty() {
      draft.keywords = trimmed(&self.keywords);
    }
    if !self.co_authors.is_empty() {
      draft.co_author_ids = trimmed(&self.co_authors);
    }
    if self.upload_date.is_some() {
      draft.upload_date = self.upload_date;
    }
    if self.publish_date.is_some() {
      draft.publish_date = self.publish_date;
    }
    if self.doi.is_some() {
      draft.doi = self.doi.clone();
    }
    if self.source_url.is_some() {
      draft.source_url = self.source_url.clone();
    }
  }
}

/// Arguments for [`Commands::Upload`]
#[derive(Args, Clone)]
pub struct UploadArgs {
  /// The paper's title
  pub title: String,

  /// Paper contents
  #[command(flatten)]
  pub fields: PaperFields,
}

/// Arguments for [`Commands::Update`]
#[derive(Args, Clone)]
pub struct UpdateArgs {
  /// Paper ID
  pub id: String,

  /// New title
  #[arg(long)]
  pub title: Option<String>,

  /// Fields to change; anything not given is kept
  #[command(flatten)]
  pub fields: PaperFields,
}

/// Uploads the PDF named in `fields`, if any, and records its URL in `draft`.
async fn attach_pdf<N: Notifier>(
  catalog: &Catalog<'_, N>,
  fields: &PaperFields,
  draft: &mut PaperDraft,
) -> Result<()> {
  let Some(path) = &fields.pdf else {
    return Ok(());
  };
  let bytes = tokio::fs::read(path).await?;
  let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
  let url = catalog.upload_pdf(file_name, &bytes).await.ok_or(FoliodError::Reported)?;
  draft.pdf_url = Some(url.to_string());
  Ok(())
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list<I: UserInteraction + Notifier>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  args: ListArgs,
) -> Result<()> {
  let caller = require_caller(caller.as_ref())?.clone();
  if args.all {
    require_admin(folio, Some(&caller)).await?;
  }

  let mut catalog = Catalog::new(folio, Some(caller), interaction);
  let loaded = if args.all { catalog.refresh_all().await } else { catalog.refresh().await };
  if !loaded {
    return Err(FoliodError::Reported);
  }
  let spec = args.filter();
  let papers = catalog.filtered(&spec);
  debug!("{} of {} papers match {spec:?}", papers.len(), catalog.papers().len());
  interaction.reply(ResponseContent::Papers(&papers))
}

/// Function for the [`Commands::Mine`] in the CLI.
pub async fn mine<I: UserInteraction + Notifier>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  query: &str,
) -> Result<()> {
  let caller = require_caller(caller.as_ref())?.clone();
  let mut catalog = Catalog::new(folio, Some(caller), interaction);
  if !catalog.refresh().await {
    return Err(FoliodError::Reported);
  }
  interaction.reply(ResponseContent::Papers(&catalog.search_mine(query)))
}

/// Function for the [`Commands::Show`] in the CLI.
pub async fn show<I: UserInteraction>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  id: &str,
) -> Result<()> {
  let caller = require_caller(caller.as_ref())?;
  let role = folio.roles().resolve(Some(caller)).await;
  let paper = folio.papers().get_for(Some(caller), role, id).await?;
  interaction.reply(ResponseContent::Paper(&paper))
}

/// Function for the [`Commands::Upload`] in the CLI.
pub async fn upload<I: UserInteraction + Notifier>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  args: UploadArgs,
) -> Result<()> {
  let UploadArgs { title, fields } = args;
  let mut draft = PaperDraft::new(title);
  fields.apply(&mut draft);

  let mut catalog = Catalog::new(folio, caller, interaction);
  // without a caller, create reports the login notification itself
  if catalog.caller().is_some() {
    attach_pdf(&catalog, &fields, &mut draft).await?;
  }
  let paper = catalog.create(&draft).await.ok_or(FoliodError::Reported)?;
  interaction.reply(ResponseContent::Paper(&paper))
}

/// Function for the [`Commands::Update`] in the CLI.
pub async fn update<I: UserInteraction + Notifier>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  args: UpdateArgs,
) -> Result<()> {
  let UpdateArgs { id, title, fields } = args;
  let identity = require_caller(caller.as_ref())?;
  let existing = folio.papers().get(&id).await?;
  // refuse before anything is uploaded
  let role = folio.roles().resolve(Some(identity)).await;
  if !existing.is_editable_by(identity, role) {
    return Err(FolioError::Forbidden.into());
  }
  let mut draft = existing.to_draft();
  if let Some(title) = title {
    draft.title = title;
  }
  fields.apply(&mut draft);

  let mut catalog = Catalog::new(folio, caller, interaction);
  attach_pdf(&catalog, &fields, &mut draft).await?;
  let paper = catalog.update(&id, &draft).await.ok_or(FoliodError::Reported)?;
  interaction.reply(ResponseContent::Paper(&paper))
}
