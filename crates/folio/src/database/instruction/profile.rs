//! Profile instructions: the Google Scholar ID a user has linked.

use super::*;

/// Reads the linked Scholar ID of a user.
#[derive(Debug, Clone)]
pub struct GetScholarId {
  user: Identity,
}

impl GetScholarId {
  /// Creates a lookup for `user`.
  pub fn new(user: &Identity) -> Self { Self { user: user.clone() } }
}

#[async_trait]
impl DatabaseInstruction for GetScholarId {
  type Output = Option<String>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let user = self.user.as_str().to_string();
    db.call(move |conn| {
      let id = conn
        .query_row("SELECT google_scholar_id FROM profiles WHERE user_id = ?1", [&user], |row| {
          row.get::<_, Option<String>>(0)
        })
        .optional()?;
      Ok(id.flatten())
    })
    .await
  }
}

/// Links (or, with `None`, unlinks) a Scholar ID for a user.
#[derive(Debug, Clone)]
pub struct SetScholarId {
  user:       Identity,
  scholar_id: Option<String>,
}

impl SetScholarId {
  /// Creates an update of `user`'s linked ID.
  pub fn new(user: &Identity, scholar_id: Option<&str>) -> Self {
    Self { user: user.clone(), scholar_id: scholar_id.map(String::from) }
  }
}

#[async_trait]
impl DatabaseInstruction for SetScholarId {
  type Output = ();

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (user, scholar_id) = (self.user.as_str().to_string(), self.scholar_id.clone());
    db.call(move |conn| {
      conn.execute(
        "INSERT INTO profiles (user_id, google_scholar_id) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET google_scholar_id = excluded.google_scholar_id",
        params![user, scholar_id],
      )?;
      Ok(())
    })
    .await
  }
}
