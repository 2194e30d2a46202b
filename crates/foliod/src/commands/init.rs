//! Module for setting up a [`folio`] catalog

use folio::config::CONFIG_FILE;

use super::*;

/// Arguments for [`Commands::Init`]
#[derive(Args, Clone)]
pub struct InitArgs {
  /// Where to keep the SQLite database
  #[arg(long)]
  pub db_path:         Option<PathBuf>,
  /// Where to keep uploaded PDFs
  #[arg(long)]
  pub storage_path:    Option<PathBuf>,
  /// Base URL stored PDFs are published under
  #[arg(long)]
  pub public_base_url: Option<url::Url>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init<I: UserInteraction>(
  interaction: &I,
  config_dir: &std::path::Path,
  args: InitArgs,
) -> Result<()> {
  let InitArgs { db_path, storage_path, public_base_url } = args;

  if config_dir.join(CONFIG_FILE).exists()
    && !interaction.confirm(&format!(
      "A configuration already exists in {config_dir:?}. Do you want to overwrite it?"
    ))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration. Use --config to set up a different one.",
    ))?;
    return Ok(());
  }

  let mut config = Config::default();
  match db_path {
    Some(path) => config = config.with_database_path(&path),
    None if !interaction.confirm(&format!(
      "Would you like to use the default path {:?} for the database?",
      config.database_path
    ))? =>
    {
      interaction.reply(ResponseContent::Info(
        "Please pass in your intended database path using --db-path",
      ))?;
      return Ok(());
    },
    None => {},
  }
  match storage_path {
    Some(path) => config = config.with_storage_path(&path),
    None if !interaction.confirm(&format!(
      "Would you like to use the default path {:?} for storing PDFs?",
      config.storage_path
    ))? =>
    {
      interaction.reply(ResponseContent::Info(
        "Please pass in your intended storage path using --storage-path",
      ))?;
      return Ok(());
    },
    None => {},
  }
  if let Some(url) = public_base_url {
    config = config.with_public_base_url(url);
  }

  let path = config.save(config_dir)?;
  Folio::builder().with_config(config.clone()).build().await?;
  interaction.reply(ResponseContent::Success(&format!(
    "Catalog initialized successfully\nConfig: {:?}\nDatabase: {:?}\nPDF storage: {:?}",
    path, config.database_path, config.storage_path,
  )))?;
  Ok(())
}
