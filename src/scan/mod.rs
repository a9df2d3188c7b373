//! Directory scanning.

mod files;
mod runner;

pub use files::{collect_files, SOURCE_EXTENSION};
pub use runner::{Scan, Scanner};
