use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::DecodeError;
use crate::primitive::{Endian, Reader};

pub const SOI: u16 = 0xFFD8;
pub const SOF0: u16 = 0xFFC0;
pub const APP1: u16 = 0xFFE1;

const XMP_SIGNATURE: &[u8] = b"http://ns.adobe.com";

// Upper bound on segments scanned; real files have a handful.
const MAX_SEGMENTS: usize = 1024;

lazy_static! {
    /// Marker → segment name, for everything that does not need signature
    /// disambiguation. APP1 (0xFFE1) is resolved separately into EXIF or XMP.
    static ref MARKER_NAMES: HashMap<u16, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0xFFE0, "JFIF");
        m.insert(0xFFE2, "APP2");
        m.insert(0xFFED, "IPTC");
        m.insert(0xFFEE, "APP14");
        m.insert(0xFFC0, "SOF0");
        m.insert(0xFFC1, "SOF1");
        m.insert(0xFFC2, "SOF2");
        m.insert(0xFFC3, "SOF3");
        m.insert(0xFFC4, "DHT");
        m.insert(0xFFDB, "DQT");
        m.insert(0xFFDA, "SOS");
        m
    };
}

/// Walk JPEG marker segments from `start` (normally 2, just past SOI) and
/// build a name → marker-offset table.
///
/// APP1 carries either EXIF or XMP; the 4–20 bytes following the length
/// field disambiguate (`Exif` vs the adobe namespace URL). Anything below
/// 0xFFC0 is not a marker and ends the walk.
pub fn scan(r: &mut Reader, start: u64) -> Result<HashMap<&'static str, u64>, DecodeError> {
    let outer = r.endian;
    r.endian = Endian::Big; // JPEG structure is always big-endian
    let result = scan_inner(r, start);
    r.endian = outer;
    result
}

fn scan_inner(r: &mut Reader, start: u64) -> Result<HashMap<&'static str, u64>, DecodeError> {
    let mut segments = HashMap::new();
    let mut pos = start;

    for _ in 0..MAX_SEGMENTS {
        let marker = match r.u16(pos) {
            Ok(m) => m,
            Err(_) => break,
        };
        if marker < 0xFFC0 {
            break;
        }
        let length = match r.u16(pos + 2) {
            Ok(l) => l as u64,
            Err(_) => break,
        };
        let next = pos + 2 + length;

        if marker == APP1 {
            let sig = r.bytes(pos + 4, 20).unwrap_or_default();
            if sig.starts_with(b"Exif") {
                segments.entry("EXIF").or_insert(pos);
            } else if sig.starts_with(XMP_SIGNATURE) {
                segments.entry("XMP").or_insert(pos);
            }
        } else if let Some(name) = MARKER_NAMES.get(&marker) {
            segments.entry(*name).or_insert(pos);
        }

        if next <= pos {
            break; // zero/bogus length would loop forever
        }
        pos = next;
    }

    log::trace!("segment table: {:?}", segments);
    Ok(segments)
}

/// Pixel dimensions from a SOF marker at `offset`: the frame header carries
/// precision(1), height(2), width(2) after the length field, big-endian.
pub fn sof_dimensions(r: &mut Reader, offset: u64) -> Result<(u32, u32), DecodeError> {
    let outer = r.endian;
    r.endian = Endian::Big;
    let height = r.u16(offset + 5);
    let width = r.u16(offset + 7);
    r.endian = outer;
    Ok((width? as u32, height? as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn segment(marker: u16, payload: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&marker.to_be_bytes());
        v.extend_from_slice(&((payload.len() as u16 + 2).to_be_bytes()));
        v.extend_from_slice(payload);
        v
    }

    #[test]
    fn finds_exif_app1_at_exact_offset() {
        let mut data = vec![0xFF, 0xD8];
        data.extend(segment(0xFFE0, b"JFIF\0 rest"));
        let exif_at = data.len() as u64;
        data.extend(segment(0xFFE1, b"Exif\0\0II*\0 and more padding bytes here"));
        data.extend(segment(0xFFDB, &[0u8; 8]));
        data.extend_from_slice(&[0x00, 0x00]); // stops the walk

        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Little);
        let segments = scan(&mut r, 2).unwrap();
        assert_eq!(segments.get("EXIF"), Some(&exif_at));
        assert_eq!(segments.get("JFIF"), Some(&2));
        assert!(segments.contains_key("DQT"));
        // scan restored the caller's endianness
        assert_eq!(r.endian, Endian::Little);
    }

    #[test]
    fn app1_with_adobe_namespace_is_xmp() {
        let mut data = vec![0xFF, 0xD8];
        let xmp_at = data.len() as u64;
        data.extend(segment(
            0xFFE1,
            b"http://ns.adobe.com/xap/1.0/\0<?xpacket begin",
        ));
        data.extend_from_slice(&[0x00, 0x00]);
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let segments = scan(&mut r, 2).unwrap();
        assert_eq!(segments.get("XMP"), Some(&xmp_at));
        assert!(!segments.contains_key("EXIF"));
    }

    #[test]
    fn sof_dimensions_read_big_endian() {
        let mut data = vec![0xFF, 0xD8];
        let sof_at = data.len() as u64;
        let mut payload = vec![8u8]; // precision
        payload.extend_from_slice(&4000u16.to_be_bytes());
        payload.extend_from_slice(&6000u16.to_be_bytes());
        payload.extend_from_slice(&[3, 0, 0, 0]);
        data.extend(segment(0xFFC0, &payload));
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Little);
        let (w, h) = sof_dimensions(&mut r, sof_at).unwrap();
        assert_eq!((w, h), (6000, 4000));
    }

    #[test]
    fn stops_on_non_marker() {
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0x12, 0x34, 0x00, 0x04]);
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let segments = scan(&mut r, 2).unwrap();
        assert!(segments.is_empty());
    }
}
