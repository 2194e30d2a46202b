//! Module for removing a [`folio`] catalog.

use super::*;

/// Function for the [`Commands::Clean`] in the CLI.
///
/// Deletes the database file and the PDF storage directory. The configuration is kept so the
/// catalog can be recreated with `folio init`.
pub async fn clean<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  let database = &config.database_path;
  let storage = &config.storage_path;
  if !database.exists() && !storage.exists() {
    interaction.reply(ResponseContent::Warning(&format!("No catalog found at {database:?}")))?;
    return Ok(());
  }
  interaction.reply(ResponseContent::Warning(&format!(
    "This removes the database at {database:?} and every PDF under {storage:?}"
  )))?;

  if !interaction.accepts_defaults() {
    if !interaction.confirm("Are you sure you want to delete this catalog?")? {
      interaction.reply(ResponseContent::Info("Operation cancelled"))?;
      return Ok(());
    }
    if interaction.prompt("Type DELETE to confirm deletion")? != "DELETE" {
      interaction.reply(ResponseContent::Info("Operation cancelled"))?;
      return Ok(());
    }
  }

  for suffix in ["", "-wal", "-shm"] {
    let path = PathBuf::from(format!("{}{suffix}", database.display()));
    if path.exists() {
      debug!("Removing {path:?}");
      tokio::fs::remove_file(&path).await?;
    }
  }
  if storage.exists() {
    tokio::fs::remove_dir_all(storage).await?;
  }
  interaction.reply(ResponseContent::Success("Catalog files cleaned"))?;
  Ok(())
}
