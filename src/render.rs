//! Final header rendering.
//!
//! Takes the fully merged [`SourceUnit`] and produces the guarded output
//! text: hoisted include block (deduplicated, sorted), hoisted define block
//! (original order, duplicates kept), verbatim body, all wrapped in a
//! double-inclusion guard derived from the output file name. Runs of three
//! or more blank lines are collapsed to two.

use crate::source::SourceUnit;
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

pub struct HeaderWriter<W: AsyncWriteExt + Unpin> {
    writer: BufWriter<W>,
}

impl HeaderWriter<File> {
    pub fn new(writer: BufWriter<File>) -> Self {
        Self { writer }
    }

    /// Renders the merged unit and writes the complete header text.
    pub async fn write_header(&mut self, unit: &SourceUnit, output_path: &Path) -> Result<()> {
        let text = render(unit, output_path);
        debug!("Rendered {} bytes", text.len());

        self.writer
            .write_all(text.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        self.writer.flush().await.context("Failed to flush output")
    }
}

/// Renders the guarded header text.
///
/// External includes are deduplicated (first occurrence wins) and sorted;
/// defines keep their original order and their duplicates. The asymmetry is
/// deliberate: a repeated define can carry meaning, a repeated include
/// never does.
pub fn render(unit: &SourceUnit, output_path: &Path) -> String {
    let guard = guard_symbol(output_path);

    let mut unique_includes: Vec<&str> = Vec::new();
    for include in &unit.includes {
        if !unique_includes.contains(&include.as_str()) {
            unique_includes.push(include);
        }
    }
    unique_includes.sort_unstable();

    let includes: String = unique_includes
        .iter()
        .map(|name| format!("#include <{name}>\n"))
        .collect();
    let defines: String = unit
        .defines
        .iter()
        .map(|payload| format!("#define {payload}\n"))
        .collect();

    let raw = format!(
        "#ifndef {guard}\n#define {guard}\n\n{includes}\n{defines}\n{body}\n#endif",
        body = unit.body
    );

    collapse_blank_lines(&raw)
}

/// Derives the inclusion-guard symbol from the output file name: final path
/// segment, upper-cased, every `.` replaced by `_`.
pub fn guard_symbol(output_path: &Path) -> String {
    output_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("merged.hpp")
        .to_uppercase()
        .replace('.', "_")
}

/// Collapses every run of 3+ blank lines down to 2 and terminates every
/// non-blank line with exactly one line break. Leading and trailing blank
/// lines are dropped.
pub fn collapse_blank_lines(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut blanks = 0usize;

    for line in source.split('\n') {
        if line.trim().is_empty() {
            blanks += 1;
        } else {
            for _ in 0..blanks.min(2) {
                out.push('\n');
            }
            blanks = 0;

            out.push_str(line.trim_end_matches('\r'));
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn it_derives_the_guard_from_the_file_name() {
        assert_eq!(guard_symbol(&PathBuf::from("concurrency.hpp")), "CONCURRENCY_HPP");
        assert_eq!(guard_symbol(&PathBuf::from("a.b.h")), "A_B_H");
        assert_eq!(guard_symbol(&PathBuf::from("out/nested/single.hpp")), "SINGLE_HPP");
    }

    #[test]
    fn it_collapses_long_blank_runs() {
        let collapsed = collapse_blank_lines("one\n\n\n\n\n\ntwo\n");
        assert_eq!(collapsed, "one\n\n\ntwo\n");
    }

    #[test]
    fn it_drops_trailing_blank_lines() {
        let collapsed = collapse_blank_lines("last\n\n\n");
        assert_eq!(collapsed, "last\n");
    }

    #[test]
    fn it_dedupes_and_sorts_includes() {
        let mut unit = SourceUnit::default();
        unit.includes = vec!["b", "a", "a", "c"].into_iter().map(String::from).collect();

        let text = render(&unit, &PathBuf::from("out.hpp"));
        let includes_at = text.find("#include <a>\n#include <b>\n#include <c>\n");

        assert!(includes_at.is_some());
        assert_eq!(text.matches("#include <a>").count(), 1);
    }

    #[test]
    fn it_preserves_define_order_and_duplicates() {
        let mut unit = SourceUnit::default();
        unit.defines = vec!["X 1", "Y 2", "X 1"].into_iter().map(String::from).collect();

        let text = render(&unit, &PathBuf::from("out.hpp"));

        assert!(text.contains("#define X 1\n#define Y 2\n#define X 1\n"));
    }
}
