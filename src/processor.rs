use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::MetadataStore;
use rayon::prelude::*;
use std::path::PathBuf;

/// Drain the discovery channel and decode every path through the shared
/// store. A failed decode is a warning plus a partial record, never a
/// stop; the walker guarantees each path arrives once, which keeps the
/// store's one-decode-per-path contract.
pub fn start_processing(
    config: &AppConfig,
    paths_rx: crossbeam_channel::Receiver<PathBuf>,
    store: &MetadataStore,
) -> Result<usize, AppError> {
    let workers = if config.num_workers == 0 {
        num_default_workers()
    } else {
        config.num_workers
    };
    log::info!("Starting metadata decoding with {} workers", workers);

    let paths: Vec<PathBuf> = paths_rx.iter().collect();
    log::info!("Received {} paths for decoding.", paths.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    pool.install(|| {
        paths.par_iter().for_each(|path| {
            log::debug!("Decoding started for: {:?}", path);
            let record = store.get_or_decode(path);
            match &record.error {
                Some(e) => log::warn!("Decode of {:?} recorded an error: {}", path, e),
                None => log::debug!("Decoding finished for: {:?}", path),
            }
        });
    });

    log::info!("All paths decoded.");
    Ok(paths.len())
}

fn num_default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn decodes_everything_it_receives() {
        let config = AppConfig {
            scan_directory: ".".to_string(),
            allowed_extensions: HashSet::new(),
            num_workers: 2,
            log_level: "warn".to_string(),
            open_retry_attempts: 1,
            open_retry_backoff_ms: 1,
        };
        let store = MetadataStore::with_retry(1, std::time::Duration::from_millis(1));
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(PathBuf::from("/nope/a.nef")).unwrap();
        tx.send(PathBuf::from("/nope/b.jpg")).unwrap();
        drop(tx);

        let count = start_processing(&config, rx, &store).unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.len(), 2);
        // unopenable paths still produce records
        assert!(store.records().iter().all(|r| r.error.is_some()));
    }
}
