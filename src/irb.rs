use crate::error::DecodeError;
use crate::primitive::{Endian, Reader};

/// Photoshop thumbnail resource id.
const THUMBNAIL_RESOURCE: u16 = 1036;

/// Malformed chains must terminate; real files hold a handful of resources.
const MAX_RESOURCES: usize = 64;

/// A located embedded preview: absolute offset + byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: u32,
    pub length: u32,
}

/// Walk a Photoshop Image Resource Block chain starting at `offset` and
/// return the byte range of the embedded thumbnail JPEG, if any.
///
/// Each resource: `8BIM` signature, u16 resource id, pascal-style name
/// (even-padded), u32 data length, data (even-padded). Resource 1036 holds
/// a 28-byte thumbnail header followed by raw JPEG data.
pub fn find_thumbnail(r: &mut Reader, offset: u64) -> Result<Option<ByteRange>, DecodeError> {
    let outer = r.endian;
    r.endian = Endian::Big; // IRB data is always big-endian
    let result = walk(r, offset);
    r.endian = outer;
    result
}

fn walk(r: &mut Reader, start: u64) -> Result<Option<ByteRange>, DecodeError> {
    let mut pos = start;
    for _ in 0..MAX_RESOURCES {
        let sig = match r.bytes(pos, 4) {
            Ok(s) => s,
            Err(_) => return Ok(None),
        };
        if &sig != b"8BIM" {
            return Ok(None);
        }
        let id = r.u16(pos + 4)?;
        let name_len = r.u8(pos + 6)? as u64;
        // pascal string: length byte + bytes, padded to an even total
        let mut after_name = pos + 6 + 1 + name_len;
        if (1 + name_len) % 2 != 0 {
            after_name += 1;
        }
        let data_len = r.u32(after_name)?;

        if id == THUMBNAIL_RESOURCE {
            if data_len <= 28 {
                return Ok(None);
            }
            return Ok(Some(ByteRange {
                offset: (after_name + 4 + 28) as u32,
                length: data_len - 28,
            }));
        }

        let padded = data_len as u64 + (data_len as u64 & 1);
        let next = after_name + 4 + padded;
        if next <= pos {
            return Ok(None);
        }
        pos = next;
    }
    log::warn!("IRB chain exceeded {} resources, giving up", MAX_RESOURCES);
    Ok(None)
}
