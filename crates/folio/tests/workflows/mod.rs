use super::*;

mod catalog;
mod directory;
mod reporting;
mod scholar_import;
