//! `mapper_registry` — build a name-to-location table of mapper declarations.
//!
//! Recursively scans a directory for `*.mappers.ts` files, parses each one
//! with tree-sitter, and records every top-level interface, type alias, class
//! or named re-export whose name ends in `Mapper` as
//! `Key -> ./relative/path#KeyMapper`.

pub mod config;
pub mod error;
pub mod extract;
pub mod lang;
pub mod model;
pub mod parser;
pub mod scan;
mod util;

use std::path::Path;

pub use config::{ScanConfig, ScanOptions};
pub use error::MappersError;
pub use model::{MapperEntry, Registry};

/// Scan for mappers, recording every reference relative to `output_dir`.
///
/// `options` are merged over the defaults once, then shared unchanged by the
/// whole traversal.
pub fn load_mappers(output_dir: &Path, options: ScanOptions) -> Result<Registry, MappersError> {
    let config = ScanConfig::resolve(output_dir, options)?;
    scan::scan(&config)
}
