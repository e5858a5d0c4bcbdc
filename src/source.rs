use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::DecodeError;

/// Seekable, readable byte stream over one open file.
///
/// Every read names its offset explicitly; no caller relies on a position
/// left behind by a previous call. Decode logic only sees this trait, which
/// keeps the engine testable against in-memory buffers.
pub trait ByteSource {
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` from `offset`. A short read is `Truncated`, not a panic.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), DecodeError>;
}

/// File-backed source. The handle is scoped to one decode call.
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    pub fn open(path: &Path) -> std::io::Result<FileSource> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(FileSource { file, len })
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), DecodeError> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file
            .read_exact(buf)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => DecodeError::Truncated { offset },
                _ => DecodeError::Io(e),
            })
    }
}

/// In-memory source, used by tests and anywhere bytes are already loaded.
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> MemorySource {
        MemorySource { data }
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), DecodeError> {
        let start = offset as usize;
        let end = start.checked_add(buf.len());
        match end {
            Some(end) if end <= self.data.len() => {
                buf.copy_from_slice(&self.data[start..end]);
                Ok(())
            }
            _ => Err(DecodeError::Truncated { offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_reads_in_bounds() {
        let mut src = MemorySource::new(vec![1, 2, 3, 4]);
        let mut buf = [0u8; 2];
        src.read_at(1, &mut buf).unwrap();
        assert_eq!(buf, [2, 3]);
    }

    #[test]
    fn memory_source_truncated_past_end() {
        let mut src = MemorySource::new(vec![1, 2]);
        let mut buf = [0u8; 4];
        assert!(matches!(
            src.read_at(1, &mut buf),
            Err(DecodeError::Truncated { offset: 1 })
        ));
    }
}
