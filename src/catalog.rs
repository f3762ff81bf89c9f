use anyhow::Result;
use ignore::{DirEntry, WalkBuilder};
use log::debug;
use std::path::{Path, PathBuf};

/// Collects every regular file under the root directory, recursively.
///
/// The returned catalog is sorted so one tree always yields one order; the
/// merge relies on this order only to pick which file comes first when no
/// dependency forces an order, and to break ties in suffix resolution.
pub fn collect_files(root: &Path, output_path: &Path) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(root);

    builder.hidden(true).ignore(false).git_ignore(false);
    builder.filter_entry(|e| !is_hidden(e));

    // Only resolvable when a previous run's output already exists on disk.
    let canonical_output = output_path.canonicalize().ok();

    let mut paths = Vec::new();

    for result in builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();

                if !path.is_file() {
                    continue;
                }

                // Never merge a previous run's output back into the tree.
                if let (Some(out), Ok(p)) = (canonical_output.as_deref(), path.canonicalize()) {
                    if p == out {
                        debug!("Skipping previous output: {}", path.display());
                        continue;
                    }
                }

                paths.push(path.to_path_buf());
            }
            Err(err) => {
                eprintln!("Error walking path: {err}");
            }
        }
    }

    paths.sort();
    debug!("Catalog holds {} files", paths.len());

    Ok(paths)
}

/// Determines if a file/folder is hidden (starts with a dot)
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .path()
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.starts_with('.'))
}
