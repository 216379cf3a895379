//! Script bundle loading from a zip archive or an unpacked directory.

use crate::errors::{io_error, CertError, ExError, Result};
use crate::model::ScriptBundle;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

/// Load a [`ScriptBundle`] from `path`.
///
/// A directory is walked recursively; anything else is opened as a zip
/// archive. Bundle paths are `/`-separated and relative to the bundle root.
pub fn load_bundle(path: &Path) -> Result<ScriptBundle> {
    if path.is_dir() {
        load_bundle_dir(path)
    } else {
        load_bundle_archive(path)
    }
}

fn unreadable(path: &Path, reason: impl ToString) -> ExError {
    CertError::ArchiveUnreadable {
        artifact: path.display().to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn duplicate(path: &Path, entry: String) -> ExError {
    CertError::DuplicateBundlePath {
        artifact: path.display().to_string(),
        path: entry,
    }
    .into()
}

/// Largest preallocation made from an entry's declared size.
const MAX_PREALLOC: usize = 1 << 20;

/// The declared size comes from the archive header and is not trusted.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOC, |size| size.min(MAX_PREALLOC))
}

/// Read every file entry of a zip archive into a bundle.
pub fn load_bundle_archive(path: &Path) -> Result<ScriptBundle> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| unreadable(path, e))?;

    let mut bundle = ScriptBundle::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| unreadable(path, e))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().trim_start_matches('/').to_string();
        let mut content = Vec::with_capacity(capacity_hint(entry.size()));
        entry
            .read_to_end(&mut content)
            .map_err(|e| unreadable(path, format!("{}: {}", name, e)))?;
        if !bundle.insert(name.clone(), content) {
            return Err(duplicate(path, name));
        }
    }
    Ok(bundle)
}

/// Read every regular file under `root` into a bundle.
pub fn load_bundle_dir(root: &Path) -> Result<ScriptBundle> {
    let mut bundle = ScriptBundle::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| unreadable(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| unreadable(root, e))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let content = std::fs::read(entry.path()).map_err(|e| io_error(entry.path(), e))?;
        if !bundle.insert(name.clone(), content) {
            return Err(duplicate(root, name));
        }
    }
    Ok(bundle)
}
