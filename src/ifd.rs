use std::collections::HashMap;

use crate::error::DecodeError;
use crate::primitive::{trim_ascii, Reader};

// TIFF 6.0 field types.
pub const TYPE_ASCII: u16 = 2;
pub const TYPE_SHORT: u16 = 3;
pub const TYPE_LONG: u16 = 4;
pub const TYPE_RATIONAL: u16 = 5;

/// Corruption tripwire, not a protocol limit: a declared tag count above
/// this aborts the tag loop but not the decode.
pub const MAX_IFD_ENTRIES: usize = 200;

/// One 12-byte IFD entry: {type, count, value-or-offset}.
///
/// `value` is the endian-decoded 4-byte field; SHORT (type 3) values occupy
/// only the low 16 bits and are decoded as such. `raw` keeps the value field
/// in file byte order for inline ASCII/undefined payloads (count <= 4).
#[derive(Debug, Clone, Copy)]
pub struct IfdEntry {
    pub field_type: u16,
    pub count: u32,
    pub value: u32,
    pub raw: [u8; 4],
}

/// One parsed Image File Directory: tag id → entry, plus the offset of the
/// next chained IFD (0 = end of chain).
#[derive(Debug, Default)]
pub struct Ifd {
    pub tags: HashMap<u16, IfdEntry>,
    pub next: u32,
}

impl Ifd {
    pub fn get(&self, id: u16) -> Option<&IfdEntry> {
        self.tags.get(&id)
    }

    pub fn has(&self, id: u16) -> bool {
        self.tags.contains_key(&id)
    }

    /// Generic "tag present? extract : default" helper; replaces the
    /// per-field conditional boilerplate in every decoder.
    pub fn tag_or<T>(&self, id: u16, default: T, f: impl FnOnce(&IfdEntry) -> Option<T>) -> T {
        match self.tags.get(&id) {
            Some(entry) => f(entry).unwrap_or(default),
            None => default,
        }
    }

    /// The raw value-or-offset field, or `default` when the tag is absent.
    pub fn value_or(&self, id: u16, default: u32) -> u32 {
        self.tag_or(id, default, |e| Some(e.value))
    }
}

/// Read one IFD at `offset`: a 2-byte tag count, `count` 12-byte entries,
/// then the 4-byte next-IFD offset.
///
/// A declared count beyond `MAX_IFD_ENTRIES` truncates the loop (partial
/// tags, `next` forced to 0) without failing the decode; so does a read that
/// runs off the end of the file mid-loop.
pub fn read_ifd(r: &mut Reader, offset: u64) -> Result<Ifd, DecodeError> {
    let declared = r.u16(offset)? as usize;
    let truncated = declared > MAX_IFD_ENTRIES;
    if truncated {
        log::warn!(
            "IFD at {} declares {} tags, reading only {}",
            offset,
            declared,
            MAX_IFD_ENTRIES
        );
    }
    let count = declared.min(MAX_IFD_ENTRIES);

    let mut ifd = Ifd::default();
    for i in 0..count {
        let entry_offset = offset + 2 + (i as u64) * 12;
        let record = match r.bytes(entry_offset, 12) {
            Ok(b) => b,
            Err(_) => return Ok(ifd), // ran off the file; keep partial tags
        };
        let id = r.endian.u16_of(&record[0..2]);
        let field_type = r.endian.u16_of(&record[2..4]);
        let count = r.endian.u32_of(&record[4..8]);
        let value = if field_type == TYPE_SHORT {
            // SHORT values sit in the low 2 bytes of the 4-byte field.
            r.endian.u16_of(&record[8..10]) as u32
        } else {
            r.endian.u32_of(&record[8..12])
        };
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&record[8..12]);
        ifd.tags.insert(
            id,
            IfdEntry {
                field_type,
                count,
                value,
                raw,
            },
        );
    }

    if !truncated {
        ifd.next = r
            .u32(offset + 2 + (count as u64) * 12)
            .unwrap_or(0);
    }
    Ok(ifd)
}

/// Resolve an ASCII tag to a trimmed string; "" when absent or unreadable.
/// `base` is the stream base the tag's offset is relative to (0 for TIFF
/// files, the EXIF block base for JPEG).
pub fn string_tag(r: &mut Reader, ifd: &Ifd, id: u16, base: u64) -> String {
    let entry = match ifd.get(id) {
        Some(e) => *e,
        None => return String::new(),
    };
    let count = entry.count as usize;
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return trim_ascii(&entry.raw[..count]);
    }
    r.string(base + entry.value as u64, count)
        .unwrap_or_default()
}

/// Resolve a RATIONAL tag; `None` when absent or unreadable.
pub fn rational_tag(r: &mut Reader, ifd: &Ifd, id: u16, base: u64) -> Option<f64> {
    let entry = *ifd.get(id)?;
    if entry.field_type != TYPE_RATIONAL || entry.count == 0 {
        return None;
    }
    r.rational(base + entry.value as u64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Endian;
    use crate::source::MemorySource;

    fn entry_be(id: u16, field_type: u16, count: u32, value: u32) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&id.to_be_bytes());
        v.extend_from_slice(&field_type.to_be_bytes());
        v.extend_from_slice(&count.to_be_bytes());
        v.extend_from_slice(&value.to_be_bytes());
        v
    }

    #[test]
    fn three_entry_ifd_parses_exactly() {
        let mut data = vec![0x00, 0x03];
        data.extend(entry_be(256, TYPE_LONG, 1, 6000));
        data.extend(entry_be(257, TYPE_LONG, 1, 4000));
        data.extend(entry_be(274, TYPE_SHORT, 1, 0x0006_0000)); // short in low 2 bytes
        data.extend_from_slice(&0x1234u32.to_be_bytes());

        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let ifd = read_ifd(&mut r, 0).unwrap();
        assert_eq!(ifd.tags.len(), 3);
        assert_eq!(ifd.next, 0x1234);
        assert_eq!(ifd.value_or(256, 0), 6000);
        assert_eq!(ifd.value_or(257, 0), 4000);
        // big-endian SHORT: the first two bytes of the value field
        assert_eq!(ifd.value_or(274, 0), 6);
    }

    #[test]
    fn corrupt_tag_count_truncates_without_error() {
        let mut data = vec![0x13, 0x88]; // declares 5000 tags
        for i in 0..super::MAX_IFD_ENTRIES as u16 + 10 {
            data.extend(entry_be(i, TYPE_LONG, 1, i as u32));
        }
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let ifd = read_ifd(&mut r, 0).unwrap();
        assert_eq!(ifd.tags.len(), super::MAX_IFD_ENTRIES);
        assert_eq!(ifd.next, 0);
    }

    #[test]
    fn short_loop_on_eof_keeps_partial_tags() {
        let mut data = vec![0x00, 0x04];
        data.extend(entry_be(1, TYPE_LONG, 1, 11));
        data.extend(entry_be(2, TYPE_LONG, 1, 22));
        // file ends before entries 3 and 4
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let ifd = read_ifd(&mut r, 0).unwrap();
        assert_eq!(ifd.tags.len(), 2);
    }

    #[test]
    fn absurd_string_count_reads_nothing() {
        let mut data = vec![0x00, 0x01];
        data.extend(entry_be(272, TYPE_ASCII, 0xFFFF_FFFF, 12));
        data.extend_from_slice(&[0, 0, 0, 0]);
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let ifd = read_ifd(&mut r, 0).unwrap();
        assert_eq!(string_tag(&mut r, &ifd, 272, 0), "");
    }

    #[test]
    fn tag_or_applies_default() {
        let ifd = Ifd::default();
        assert_eq!(ifd.tag_or(999, 7u32, |e| Some(e.value)), 7);
    }

    #[test]
    fn inline_ascii_comes_from_raw_bytes() {
        let mut data = vec![0x00, 0x01];
        let mut e = entry_be(272, TYPE_ASCII, 3, 0);
        e[8..11].copy_from_slice(b"D5\0");
        data.extend(e);
        data.extend_from_slice(&[0, 0, 0, 0]);
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let ifd = read_ifd(&mut r, 0).unwrap();
        assert_eq!(string_tag(&mut r, &ifd, 272, 0), "D5");
    }
}
