//! The co-author directory.

use folio::co_author::NewCoAuthor;

use super::*;

/// Directory operations
#[derive(Subcommand, Clone)]
pub enum CoAuthorCommands {
  /// List active entries. Emails are shown to admins only.
  List,

  /// Add an entry (admins only)
  Add {
    /// Full display name
    name: String,

    /// Contact email
    email: String,

    /// Department code or name
    #[arg(long, value_parser = parse_arg::<Department>)]
    department: Option<Department>,
  },

  /// Hide an entry from listings (admins only)
  Deactivate {
    /// Directory ID
    id: String,
  },
}

/// Function for the [`Commands::CoAuthors`] in the CLI.
pub async fn co_authors<I: UserInteraction + Notifier>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  cmd: CoAuthorCommands,
) -> Result<()> {
  match cmd {
    CoAuthorCommands::List => {
      let catalog = Catalog::new(folio, caller, interaction);
      let is_admin = catalog.role().await.is_admin();
      let entries = catalog.co_authors(is_admin).await;
      interaction.reply(ResponseContent::CoAuthors(&entries))
    },
    CoAuthorCommands::Add { name, email, department } => {
      require_admin(folio, caller.as_ref()).await?;
      let mut entry = NewCoAuthor::new(name, email);
      if let Some(department) = department {
        entry = entry.with_department(department);
      }
      let added = folio.co_authors().add(&entry).await?;
      interaction.reply(ResponseContent::Success(&format!(
        "Added {} to the directory with ID {}",
        added.full_name, added.id
      )))
    },
    CoAuthorCommands::Deactivate { id } => {
      require_admin(folio, caller.as_ref()).await?;
      folio.co_authors().deactivate(&id).await?;
      interaction.reply(ResponseContent::Success(&format!("Deactivated co-author {id}")))
    },
  }
}
