//! # hpp2one Library
//!
//! This crate merges a directory tree of modular C/C++ headers into one
//! self-contained header file:
//!
//! - Local `#include "..."` dependencies are inlined, dependencies first,
//!   each file exactly once
//! - External `#include <...>` lines are hoisted to the top, deduplicated
//!   and sorted
//! - `#define` lines are hoisted in first-seen order, duplicates kept
//! - Per-file inclusion guards are stripped and a single guard wraps the
//!   result
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hpp2one::{Config, run_hpp2one};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         output_path: PathBuf::from("single.hpp"),
//!         root_dir: PathBuf::from("include"),
//!         strict: false,
//!         verbosity: 0,
//!     };
//!
//!     run_hpp2one(config).await
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod render;
pub mod resolver;
pub mod source;

pub use catalog::collect_files;
pub use cli::Config;
pub use render::HeaderWriter;
pub use resolver::Resolver;
pub use source::SourceUnit;

use anyhow::{Context, Result};
use log::info;
use tokio::fs::File;
use tokio::io::BufWriter;

/// Merge the header tree under `config.root_dir` into a single guarded
/// header at `config.output_path`.
///
/// The output file is only created after the whole merge has succeeded, so
/// a failing run never leaves a partial header behind.
pub async fn run_hpp2one(config: Config) -> Result<()> {
    let catalog = collect_files(&config.root_dir, &config.output_path)?;
    info!(
        "Merging {} files from {}",
        catalog.len(),
        config.root_dir.display()
    );

    let mut resolver = Resolver::new(catalog, config.strict);
    let merged = resolver.merge_all()?;

    let file = File::create(&config.output_path)
        .await
        .with_context(|| {
            format!(
                "Failed to create output file: {}",
                config.output_path.display()
            )
        })?;
    let mut writer = HeaderWriter::new(BufWriter::new(file));
    writer.write_header(&merged, &config.output_path).await?;

    info!("Wrote {}", config.output_path.display());
    Ok(())
}
