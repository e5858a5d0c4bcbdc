use crate::error::AppError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively discover candidate image files under `root` and push them to
/// the decode channel. `allowed` holds lower-cased extensions; by default it
/// mirrors the dispatcher's known set. Unreadable directory entries are
/// skipped, not fatal. Returns the number of paths sent.
pub fn start_walking(
    root: &Path,
    allowed: &HashSet<String>,
    paths_tx: &crossbeam_channel::Sender<PathBuf>,
) -> Result<usize, AppError> {
    log::info!("Starting file discovery in {:?}", root);

    let mut found = 0;
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = match path.extension().and_then(|s| s.to_str()) {
            Some(e) => e.to_lowercase(),
            None => continue,
        };
        if !allowed.contains(&ext) {
            log::trace!("skipping {:?}: extension not in allow-list", path);
            continue;
        }
        log::debug!("Sending image file to decoder: {:?}", path);
        paths_tx.send(path.to_path_buf())?;
        found += 1;
    }

    log::info!("File discovery complete, {} candidate files.", found);
    Ok(found)
}
