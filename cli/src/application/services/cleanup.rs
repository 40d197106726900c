//! Application service — remove files installed by the previous cycle.

use std::fs;
use std::path::{Path, PathBuf};

use crate::application::ports::ProgressReporter;

/// Remove every path the previous cycle's manifest recorded, in manifest
/// order. Side effect only: a path that cannot be removed is warned about
/// (or silently skipped for shared directories) and never aborts the pass.
///
/// Directories that still hold files not owned by the manifest survive;
/// empty ancestor directories are pruned upward, never crossing `root`.
pub fn clean_previous(root: &Path, manifest: &[String], reporter: &impl ProgressReporter) {
    if manifest.is_empty() {
        return;
    }
    reporter.step("removing files from the previous bundle");

    for entry in manifest {
        let path = resolve_under(root, entry);
        // symlink_metadata so a link is handled as a link, not its target
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };

        let file_type = meta.file_type();
        if file_type.is_symlink() || file_type.is_file() {
            match fs::remove_file(&path) {
                Ok(()) => prune_empty_ancestors(root, &path),
                Err(err) => reporter.warn(&format!("could not remove {}: {err}", path.display())),
            }
        } else if file_type.is_dir() {
            // A still-populated directory is shared with files we do not
            // own; leave it without noise.
            if fs::remove_dir(&path).is_ok() {
                prune_empty_ancestors(root, &path);
            }
        } else {
            reporter.warn(&format!(
                "leaving {} in place: unexpected file type",
                path.display()
            ));
        }
    }
}

/// Join a manifest entry (always `/`-prefixed) under the extraction root.
/// With the production root `/` this resolves back to the entry itself.
fn resolve_under(root: &Path, entry: &str) -> PathBuf {
    root.join(entry.trim_start_matches('/'))
}

/// Remove now-empty parent directories of `removed`, walking upward until
/// a directory is non-empty (or otherwise refuses removal) or `root` is
/// reached. `root` itself is never removed.
fn prune_empty_ancestors(root: &Path, removed: &Path) {
    let mut dir = removed.parent().map(Path::to_path_buf);
    while let Some(current) = dir {
        if !current.starts_with(root) || current == root {
            break;
        }
        if fs::remove_dir(&current).is_err() {
            break;
        }
        dir = current.parent().map(Path::to_path_buf);
    }
}
