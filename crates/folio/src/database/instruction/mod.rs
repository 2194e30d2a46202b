//! Database instructions.
//!
//! Each instruction is a small value describing one operation against the catalog database.
//! Building an instruction is free; nothing touches the database until
//! [`DatabaseInstruction::execute`] is awaited.
//!
//! ```no_run
//! use folio::{
//!   database::{Database, DatabaseInstruction, GetRole, SetRole},
//!   paper::Identity,
//!   role::Role,
//! };
//!
//! # async fn example(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
//! let alice = Identity::from("alice");
//! SetRole::new(&alice, Role::Admin).execute(db).await?;
//! assert_eq!(GetRole::new(&alice).execute(db).await?, Some(Role::Admin));
//! # Ok(())
//! # }
//! ```

use rusqlite::{params, OptionalExtension};

use super::*;

mod co_author;
mod paper;
mod profile;
mod role;

pub use self::{co_author::*, paper::*, profile::*, role::*};

/// An operation that can be run against a [`Database`].
#[async_trait]
pub trait DatabaseInstruction {
  /// What the instruction yields on success.
  type Output;

  /// Runs the instruction.
  async fn execute(&self, db: &Database) -> Result<Self::Output>;
}
