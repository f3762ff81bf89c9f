//! Dependency-ordered merge.
//!
//! The resolver flattens the header tree depth-first: a file's local
//! dependencies are fully emitted before the file itself, and a shared
//! emitted set guarantees every file lands in the output exactly once, no
//! matter how many include paths reach it (the diamond case). Cyclic
//! includes are detected against the active resolution stack and fail the
//! run instead of recursing forever.

use crate::source::SourceUnit;
use anyhow::{Result, bail};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::PathBuf;

pub struct Resolver {
    catalog: Vec<PathBuf>,
    /// Paths already merged into the output. Grows monotonically over one
    /// run; the single source of truth for exactly-once emission.
    emitted: HashSet<PathBuf>,
    /// Paths currently being resolved, innermost last.
    resolving: Vec<PathBuf>,
    strict: bool,
}

impl Resolver {
    pub fn new(catalog: Vec<PathBuf>, strict: bool) -> Self {
        Self {
            catalog,
            emitted: HashSet::new(),
            resolving: Vec::new(),
            strict,
        }
    }

    /// Merges every catalog file exactly once, dependencies first, and
    /// returns the combined unit for the whole tree.
    pub fn merge_all(&mut self) -> Result<SourceUnit> {
        let mut total = SourceUnit::default();

        for i in 0..self.catalog.len() {
            let path = self.catalog[i].clone();
            if self.emitted.contains(&path) {
                continue;
            }

            debug!("Merging {}", path.display());
            let own = SourceUnit::read(&path)?;

            self.resolving.push(path.clone());
            let prefix = self.resolve(&own.deps);
            self.resolving.pop();

            let mut unit = prefix?;
            unit.absorb(own);
            total.absorb(unit);
            self.emitted.insert(path);
        }

        Ok(total)
    }

    /// Resolves a list of declared dependency names into the combined
    /// content that must be emitted before the requesting file, marking
    /// each newly merged path in the shared emitted set.
    ///
    /// Names that match no catalog path are skipped with a warning, or
    /// fail the run in strict mode.
    pub fn resolve(&mut self, deps: &[String]) -> Result<SourceUnit> {
        let mut out = SourceUnit::default();

        for name in deps {
            let Some(path) = self.lookup(name) else {
                if self.strict {
                    bail!("local include \"{name}\" matches no file in the tree");
                }
                warn!("Local include \"{name}\" matches no file in the tree, skipping");
                continue;
            };

            // Already merged by this or a sibling call.
            if self.emitted.contains(&path) {
                continue;
            }

            if self.resolving.contains(&path) {
                bail!(
                    "include cycle detected: {} is part of its own dependency chain",
                    path.display()
                );
            }

            let own = SourceUnit::read(&path)?;

            self.resolving.push(path.clone());
            let prefix = self.resolve(&own.deps);
            self.resolving.pop();

            let mut unit = prefix?;
            unit.absorb(own);
            out.absorb(unit);

            // Must happen before the next sibling is processed, or two
            // siblings sharing a sub-dependency would both merge it.
            self.emitted.insert(path);
        }

        Ok(out)
    }

    /// Suffix match against the catalog; first match in catalog order wins.
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.catalog
            .iter()
            .find(|p| p.to_string_lossy().ends_with(name))
            .cloned()
    }
}
