use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use crate::formats;
use crate::metadata::ImageMetadata;
use crate::source::FileSource;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

/// Path-keyed table of completed records, the engine's externally visible
/// cache.
///
/// Point reads take the read lock; a decode runs entirely outside any lock
/// and only the final insert takes the write lock, so readers stay safe
/// while a writer inserts. The store does not serialize duplicate decodes
/// of the same path; callers must keep at most one decode in flight per
/// path. Records are never mutated after insert except for `picked`.
pub struct MetadataStore {
    records: RwLock<HashMap<String, ImageMetadata>>,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl Default for MetadataStore {
    fn default() -> Self {
        MetadataStore::new()
    }
}

impl MetadataStore {
    pub fn new() -> MetadataStore {
        MetadataStore::with_retry(
            DEFAULT_RETRY_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        )
    }

    pub fn with_retry(attempts: u32, backoff: Duration) -> MetadataStore {
        MetadataStore {
            records: RwLock::new(HashMap::new()),
            retry_attempts: attempts.max(1),
            retry_backoff: backoff,
        }
    }

    /// Return the cached record for `path`, decoding on a miss. Idempotent
    /// after the first decode: later calls return the stored record
    /// unchanged, whether it succeeded or not.
    pub fn get_or_decode(&self, path: &Path) -> ImageMetadata {
        let key = path.to_string_lossy().to_string();
        if let Some(existing) = self.records.read().unwrap().get(&key) {
            return existing.clone();
        }

        let record = self.decode(path, &key);
        let mut records = self.records.write().unwrap();
        records.entry(key).or_insert_with(|| record.clone());
        record
    }

    fn decode(&self, path: &Path, key: &str) -> ImageMetadata {
        let vendor = match formats::vendor_for_path(path) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("{}: {}", key, e);
                let mut meta = ImageMetadata::new(key);
                meta.error = Some(e.record_message());
                return meta;
            }
        };

        let mut src = match self.open_with_retry(path) {
            Some(src) => src,
            None => {
                let mut meta = ImageMetadata::new(key);
                meta.error = Some("could not open file".to_string());
                return meta;
            }
        };
        log::debug!("decoding {} as {:?}", key, vendor);
        formats::decode_source(vendor, &mut src, key)
    }

    /// Bounded open-retry: transient failures (files still being written by
    /// a camera import, for instance) get a short fixed backoff.
    fn open_with_retry(&self, path: &Path) -> Option<FileSource> {
        for attempt in 0..self.retry_attempts {
            match FileSource::open(path) {
                Ok(src) => return Some(src),
                Err(e) => {
                    log::warn!(
                        "open attempt {}/{} for {:?} failed: {}",
                        attempt + 1,
                        self.retry_attempts,
                        path,
                        e
                    );
                    if attempt + 1 < self.retry_attempts {
                        std::thread::sleep(self.retry_backoff);
                    }
                }
            }
        }
        None
    }

    pub fn get(&self, path: &Path) -> Option<ImageMetadata> {
        let key = path.to_string_lossy();
        self.records.read().unwrap().get(key.as_ref()).cloned()
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        let key = path.to_string_lossy();
        self.records
            .read()
            .unwrap()
            .get(key.as_ref())
            .map(|m| m.loaded)
            .unwrap_or(false)
    }

    /// Flip the caller-owned selection flag. Returns false when the path
    /// has no record yet.
    pub fn set_picked(&self, path: &Path, picked: bool) -> bool {
        let key = path.to_string_lossy();
        match self.records.write().unwrap().get_mut(key.as_ref()) {
            Some(record) => {
                record.picked = picked;
                true
            }
            None => false,
        }
    }

    /// Snapshot of every record, ordered by path.
    pub fn records(&self) -> Vec<ImageMetadata> {
        let mut all: Vec<ImageMetadata> = self.records.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        all
    }

    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unopenable_file_records_open_error_after_retries() {
        let store = MetadataStore::with_retry(2, Duration::from_millis(1));
        let record = store.get_or_decode(Path::new("/definitely/not/here.nef"));
        assert_eq!(record.error.as_deref(), Some("could not open file"));
        assert!(!record.loaded);
        // and the failure is cached
        assert!(store.get(Path::new("/definitely/not/here.nef")).is_some());
    }

    #[test]
    fn unsupported_extension_reads_no_bytes() {
        let store = MetadataStore::new();
        let record = store.get_or_decode(Path::new("/whatever.png"));
        assert!(!record.loaded);
        assert!(record
            .error
            .as_deref()
            .unwrap()
            .contains("unsupported extension"));
    }

    #[test]
    fn set_picked_requires_a_record() {
        let store = MetadataStore::with_retry(1, Duration::from_millis(1));
        let path = Path::new("/missing.jpg");
        assert!(!store.set_picked(path, true));
        store.get_or_decode(path);
        assert!(store.set_picked(path, true));
        assert!(store.get(path).unwrap().picked);
    }

    #[test]
    fn clear_empties_the_table() {
        let store = MetadataStore::with_retry(1, Duration::from_millis(1));
        store.get_or_decode(Path::new("/a.jpg"));
        assert_eq!(store.len(), 1);
        store.clear();
        assert!(store.is_empty());
    }
}
