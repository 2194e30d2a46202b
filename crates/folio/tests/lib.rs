use std::error::Error;

use chrono::NaiveDate;
use folio::{
  co_author::NewCoAuthor,
  filter::{self, FilterSpec},
  notification::{Level, RecordingNotifier},
  paper::{Department, Identity, PaperDraft, Status},
  prelude::*,
  report,
  role::Role,
  scholar::{self, ScholarClient},
  session::Catalog,
  Config, Folio,
};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

mod workflows;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

pub async fn create_test_folio() -> (Folio, TempDir) {
  let dir = tempdir().unwrap();
  let config = Config::default()
    .with_database_path(&dir.path().join("folio.db"))
    .with_storage_path(&dir.path().join("papers"));
  let folio = Folio::builder().with_config(config).build().await.unwrap();
  (folio, dir)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }
