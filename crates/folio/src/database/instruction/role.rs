//! Role side-table instructions.

use super::*;
use crate::role::Role;

/// Looks up the role row for an identity. `None` when there is no row.
#[derive(Debug, Clone)]
pub struct GetRole {
  user: Identity,
}

impl GetRole {
  /// Creates a lookup for `user`.
  pub fn new(user: &Identity) -> Self { Self { user: user.clone() } }
}

#[async_trait]
impl DatabaseInstruction for GetRole {
  type Output = Option<Role>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let user = self.user.as_str().to_string();
    db.call(move |conn| {
      let role = conn
        .query_row("SELECT role FROM user_roles WHERE user_id = ?1", [&user], |row| {
          parse_column::<Role>(row, 0)
        })
        .optional()?;
      Ok(role)
    })
    .await
  }
}

/// Sets (or replaces) the role row for an identity.
#[derive(Debug, Clone)]
pub struct SetRole {
  user: Identity,
  role: Role,
}

impl SetRole {
  /// Creates an assignment of `role` to `user`.
  pub fn new(user: &Identity, role: Role) -> Self { Self { user: user.clone(), role } }
}

#[async_trait]
impl DatabaseInstruction for SetRole {
  type Output = ();

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (user, role) = (self.user.as_str().to_string(), self.role);
    db.call(move |conn| {
      conn.execute(
        "INSERT INTO user_roles (user_id, role) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET role = excluded.role",
        params![user, role.as_str()],
      )?;
      Ok(())
    })
    .await
  }
}
