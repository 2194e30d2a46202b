//! Role lookup and assignment.

use super::*;

/// Function for the [`Commands::Role`] in the CLI.
pub async fn role<I: UserInteraction>(
  interaction: &I,
  folio: &Folio,
  caller: Option<Identity>,
) -> Result<()> {
  let role = folio.roles().resolve(caller.as_ref()).await;
  let message = match &caller {
    Some(caller) => format!("{caller} has role {role}"),
    None => format!("Not logged in (role {role})"),
  };
  interaction.reply(ResponseContent::Info(&message))
}

/// Function for the [`Commands::Grant`] in the CLI.
///
/// This writes the role table of the local catalog directly and performs no caller check; it
/// is how the first administrator is created.
pub async fn grant<I: UserInteraction>(
  interaction: &I,
  folio: &Folio,
  user: &str,
  role: Role,
) -> Result<()> {
  let user = Identity::from(user.trim());
  if user.as_str().is_empty() {
    return Err(FoliodError::Usage("A user is required".into()));
  }
  folio.roles().assign(&user, role).await?;
  interaction.reply(ResponseContent::Success(&format!("{user} now has role {role}")))
}
