//! Caller roles.
//!
//! A caller is either an administrator, a teacher, or nothing at all. Roles are stored one row
//! per identity; callers without a row get the configured fallback
//! ([`Role::Teacher`] unless configured otherwise).

use super::*;
use crate::{
  database::{DatabaseInstruction, GetRole, SetRole},
  paper::authenticated,
};

/// The role of a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// May see every paper, real co-author emails, and reports
  Admin,
  /// May manage their own papers
  #[default]
  Teacher,
  /// No privileges
  None,
}

impl Role {
  /// The stored representation.
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::Teacher => "teacher",
      Role::None => "none",
    }
  }

  /// Whether this is [`Role::Admin`].
  pub fn is_admin(&self) -> bool { matches!(self, Role::Admin) }
}

impl Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
  type Err = FolioError;

  fn from_str(s: &str) -> Result<Self> {
    match &s.trim().to_lowercase() as &str {
      "admin" => Ok(Role::Admin),
      "teacher" => Ok(Role::Teacher),
      "none" => Ok(Role::None),
      s => Err(FolioError::InvalidRole(s.to_owned())),
    }
  }
}

/// Resolves callers to roles. Nothing is cached; every call reads the store.
#[derive(Debug, Clone, Copy)]
pub struct RoleResolver<'a> {
  /// Backing store
  db:       &'a Database,
  /// Role for callers without a row, or when the lookup fails
  fallback: Role,
}

impl<'a> RoleResolver<'a> {
  /// Creates a resolver over `db`.
  pub fn new(db: &'a Database, fallback: Role) -> Self { Self { db, fallback } }

  /// Resolves the role of `caller`.
  ///
  /// An unauthenticated or blank caller is [`Role::None`]. A missing row or a failed lookup
  /// yields the fallback role; this never fails.
  pub async fn resolve(&self, caller: Option<&Identity>) -> Role {
    let Some(caller) = authenticated(caller) else {
      return Role::None;
    };
    match GetRole::new(caller).execute(self.db).await {
      Ok(Some(role)) => role,
      Ok(None) => {
        debug!("No role row for {caller}, using {}", self.fallback);
        self.fallback
      },
      Err(e) => {
        warn!("Role lookup for {caller} failed, using {}: {e}", self.fallback);
        self.fallback
      },
    }
  }

  /// Stores `role` for `identity`.
  pub async fn assign(&self, identity: &Identity, role: Role) -> Result<()> {
    SetRole::new(identity, role).execute(self.db).await?;
    info!("Assigned role {role} to {identity}");
    Ok(())
  }
}
