//! Parsed content of one header file.
//!
//! A [`SourceUnit`] is either the parse of exactly one file or the
//! accumulation of several units combined with [`SourceUnit::absorb`].
//! Parsing splits a file into opaque body text and three directive lists;
//! nothing is deduplicated or reordered here, that is the renderer's job.

use anyhow::{Context, Result, bail};
use content_inspector::{ContentType, inspect};
use log::debug;
use memmap2::MmapOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::path::Path;
use std::str;

static GUARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"#ifndef|#endif").unwrap());
static LOCAL_INCLUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"#include "(.+?)""#).unwrap());
static EXTERNAL_INCLUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#include <(.+?)>").unwrap());
static DEFINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#define (.+)").unwrap());

#[derive(Debug, Default, Clone)]
pub struct SourceUnit {
    /// Body text with all directive lines removed, original order kept.
    pub body: String,
    /// Local `#include "..."` names, in file order, duplicates kept.
    pub deps: Vec<String>,
    /// External `#include <...>` names, in file order, duplicates kept.
    pub includes: Vec<String>,
    /// `#define` payloads, in file order, duplicates kept.
    pub defines: Vec<String>,
}

impl SourceUnit {
    /// Reads and classifies one file, line by line.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let mmap = unsafe {
            MmapOptions::new()
                .map(&file)
                .with_context(|| format!("Failed to mmap file: {}", path.display()))?
        };

        let sample_size = std::cmp::min(8192, mmap.len());
        if inspect(&mmap[..sample_size]) == ContentType::BINARY {
            bail!(
                "{} is a binary file; the input tree must contain only text",
                path.display()
            );
        }

        let text = str::from_utf8(&mmap)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;

        let unit = Self::parse(text);
        debug!(
            "Parsed {}: {} local deps, {} includes, {} defines",
            path.display(),
            unit.deps.len(),
            unit.includes.len(),
            unit.defines.len()
        );

        Ok(unit)
    }

    /// Classifies raw text without touching the filesystem.
    ///
    /// Classification is mutually exclusive and checked in a fixed order:
    /// guard line, local include, external include, define, body. A line
    /// containing `#ifndef` or `#endif` counts as a guard line and is
    /// dropped; the `#define GUARD` line of a per-file guard is collected
    /// as an ordinary define.
    pub fn parse(text: &str) -> Self {
        let mut unit = Self::default();

        for line in text.split_inclusive('\n') {
            if GUARD.is_match(line) {
                continue;
            }
            if let Some(caps) = LOCAL_INCLUDE.captures(line) {
                unit.deps.push(caps[1].to_string());
                continue;
            }
            if let Some(caps) = EXTERNAL_INCLUDE.captures(line) {
                unit.includes.push(caps[1].to_string());
                continue;
            }
            if let Some(caps) = DEFINE.captures(line) {
                unit.defines.push(caps[1].to_string());
                continue;
            }
            unit.body.push_str(line);
        }

        unit
    }

    /// Appends another unit after this one, field by field.
    ///
    /// Combination never reorders or filters; `a.absorb(b)` means
    /// "everything in `a` is emitted before `b`". Deduplication is deferred
    /// to rendering.
    pub fn absorb(&mut self, other: SourceUnit) {
        self.body.push_str(&other.body);
        self.deps.extend(other.deps);
        self.includes.extend(other.includes);
        self.defines.extend(other.defines);
    }
}
