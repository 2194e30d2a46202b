//! Google Scholar linking and import.

use folio::scholar::{self, ScholarClient};

use super::*;

/// Scholar operations
#[derive(Subcommand, Clone)]
pub enum ScholarCommands {
  /// Link a Scholar ID (or profile URL) to your account
  Link {
    /// Bare ID such as `JicYPdAAAAAJ`, or a profile URL containing `user=`
    id: String,
  },

  /// Remove your linked Scholar ID
  Unlink,

  /// List the publications on a profile
  Fetch {
    /// Scholar ID or profile URL; your linked ID when absent
    id: Option<String>,
  },

  /// Import publications from a profile as draft papers
  Import {
    /// Scholar ID or profile URL; your linked ID when absent
    id: Option<String>,

    /// Numbers of the publications to import, as shown by `fetch`
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    select: Vec<usize>,

    /// Import every publication
    #[arg(long)]
    all: bool,
  },
}

/// The ID to fetch: the one given, or the caller's linked one.
async fn scholar_id(
  folio: &Folio,
  caller: Option<&Identity>,
  id: Option<String>,
) -> Result<String> {
  if let Some(id) = id {
    return Ok(id);
  }
  let caller = require_caller(caller)?;
  folio.profiles().scholar_id(caller).await?.ok_or_else(|| {
    FoliodError::Usage(
      "No Scholar ID given and none linked. Use `folio scholar link <ID>` first.".into(),
    )
  })
}

/// Parses a selection such as `0, 2,5`. Empty input selects nothing.
fn parse_selection(input: &str) -> Result<Vec<usize>> {
  input
    .split(',')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .map(|part| {
      part.parse().map_err(|_| FoliodError::Usage(format!("Not a publication number: {part}")))
    })
    .collect()
}

/// Function for the [`Commands::Scholar`] in the CLI.
pub async fn scholar<I: UserInteraction + Notifier>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
  cmd: ScholarCommands,
) -> Result<()> {
  match cmd {
    ScholarCommands::Link { id } => {
      let caller = require_caller(caller.as_ref())?;
      let id = folio.profiles().set_scholar_id(caller, &id).await?;
      interaction.reply(ResponseContent::Success(&format!(
        "Linked Scholar profile {}",
        scholar::profile_url(&id)
      )))
    },
    ScholarCommands::Unlink => {
      let caller = require_caller(caller.as_ref())?;
      folio.profiles().clear_scholar_id(caller).await?;
      interaction.reply(ResponseContent::Success("Scholar profile unlinked"))
    },
    ScholarCommands::Fetch { id } => {
      let id = scholar_id(folio, caller.as_ref(), id).await?;
      let fetched = ScholarClient::from_config(&folio.config)?.fetch_publications(&id).await?;
      if let Some(name) = &fetched.author.name {
        interaction.reply(ResponseContent::Info(&format!("{name} ({})", fetched.profile_url)))?;
      }
      if fetched.is_empty() {
        return interaction.reply(ResponseContent::Warning(&fetched.message));
      }
      interaction.reply(ResponseContent::Success(&fetched.message))?;
      interaction.reply(ResponseContent::Publications(&fetched.publications))
    },
    ScholarCommands::Import { id, select, all } => {
      require_caller(caller.as_ref())?;
      let id = scholar_id(folio, caller.as_ref(), id).await?;
      let fetched = ScholarClient::from_config(&folio.config)?.fetch_publications(&id).await?;
      if fetched.is_empty() {
        return interaction.reply(ResponseContent::Warning(&fetched.message));
      }

      let selected = if all || !select.is_empty() {
        select
      } else {
        interaction.reply(ResponseContent::Publications(&fetched.publications))?;
        parse_selection(&interaction.prompt("Publications to import (e.g. 0,2,5; empty for all)")?)?
      };
      let drafts = if selected.is_empty() {
        scholar::stage_all(&fetched.publications)
      } else {
        scholar::stage_for_import(&selected, &fetched.publications)
      };
      if drafts.is_empty() {
        return interaction.reply(ResponseContent::Info("Nothing selected"));
      }

      let mut catalog = Catalog::new(folio, caller, interaction);
      if catalog.import(&drafts).await == 0 {
        return Err(FoliodError::Reported);
      }
      Ok(())
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_selection() {
    assert_eq!(parse_selection(" 0, 2,5 ").unwrap(), vec![0, 2, 5]);
    assert!(parse_selection("").unwrap().is_empty());
    assert!(parse_selection("1,two").is_err());
  }
}
