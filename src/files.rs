//! Locating recordings on disk.
//!
//! Recordings live under a base directory split into label subdirectories
//! `0/` and `1/`, each searched recursively. A recording's file is the
//! first `.wav` (in sorted path order) whose file name contains its ID.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Label subdirectories searched under the base directory, in order.
pub const LABEL_DIRS: [&str; 2] = ["0", "1"];

/// Extension of recording files, matched case-insensitively.
pub const AUDIO_EXTENSION: &str = "wav";

/// All recording files under `base`, in search order.
///
/// Missing or unreadable directories contribute nothing.
pub fn list_audio_files<P: AsRef<Path>>(base: P) -> Vec<PathBuf> {
    let base = base.as_ref();
    LABEL_DIRS
        .iter()
        .flat_map(|label| {
            let mut files = BTreeSet::new();
            collect_files_recursive(&base.join(label), &mut files);
            files
        })
        .collect()
}

/// Find the recording file for `id` under `base`.
///
/// # Examples
/// ```no_run
/// use glottis::files::find_audio_path;
///
/// if let Some(path) = find_audio_path("/data/recordings", "a1b2c3") {
///     println!("{}", path.display());
/// }
/// ```
pub fn find_audio_path<P: AsRef<Path>>(base: P, id: &str) -> Option<PathBuf> {
    if id.is_empty() {
        return None;
    }
    list_audio_files(base)
        .into_iter()
        .find(|path| file_name_contains(path, id))
}

/// Resolve many IDs with a single directory walk.
///
/// IDs without a matching file are left out of the result.
pub fn find_all_audio_paths<P, S>(base: P, ids: &[S]) -> BTreeMap<String, PathBuf>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let files = list_audio_files(base);
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| !id.is_empty())
        .filter_map(|id| {
            files
                .iter()
                .find(|path| file_name_contains(path, id))
                .map(|path| (id.to_string(), path.clone()))
        })
        .collect()
}

fn file_name_contains(path: &Path, id: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(id))
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

fn collect_files_recursive(dir: &Path, out: &mut BTreeSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, out);
        } else if path.is_file() && is_audio_file(&path) {
            out.insert(path);
        }
    }
}
