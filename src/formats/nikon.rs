use crate::error::DecodeError;
use crate::formats::exif::{
    apply_exif_ifd, apply_ifd0, read_tiff_header, sub_ifd_offsets, TAG_IMAGE_HEIGHT,
    TAG_IMAGE_WIDTH, TAG_JPEG_LENGTH, TAG_JPEG_OFFSET, TAG_MAKER_NOTE,
};
use crate::ifd::{read_ifd, string_tag, Ifd};
use crate::metadata::ImageMetadata;
use crate::nikon_lens;
use crate::primitive::{Endian, Reader};
use crate::source::ByteSource;
use crate::tags::{self, Namespace};

// Nikon maker-note tags
const TAG_SERIAL: u16 = 0x001D;
const TAG_LENS_TYPE: u16 = 0x0083;
const TAG_LENS_DATA: u16 = 0x0098;
const TAG_SHUTTER_COUNT: u16 = 0x00A7;

// How far past the maker-note tag offset the inner endianness marker may sit.
const MAKER_HEADER_SCAN: u64 = 32;

/// NEF: TIFF layout with the previews hung off three chained subIFDs
/// (tag 330): subIFD1 = full-size JPEG, subIFD2 = pixel dimensions of the
/// raw image, subIFD3 = small JPEG. The maker note declares its own
/// endianness and addresses everything relative to its inner header.
pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let mut r = Reader::new(src, Endian::Little);
    let header = read_tiff_header(&mut r, 0)?;
    let ifd0 = read_ifd(&mut r, header.ifd0 as u64)?;
    apply_ifd0(&mut r, &ifd0, 0, meta);

    let subs = sub_ifd_offsets(&mut r, &ifd0, 0);
    for (i, &offset) in subs.iter().enumerate() {
        let sub = match read_ifd(&mut r, offset as u64) {
            Ok(ifd) => ifd,
            Err(_) => continue,
        };
        match i {
            0 => {
                meta.offset_full_jpg = sub.value_or(TAG_JPEG_OFFSET, 0);
                meta.length_full_jpg = sub.value_or(TAG_JPEG_LENGTH, 0);
            }
            1 => {
                let w = sub.value_or(TAG_IMAGE_WIDTH, 0);
                let h = sub.value_or(TAG_IMAGE_HEIGHT, 0);
                if w > 0 && h > 0 {
                    meta.set_dimensions(w, h);
                }
            }
            2 => {
                meta.offset_small_jpg = sub.value_or(TAG_JPEG_OFFSET, 0);
                meta.length_small_jpg = sub.value_or(TAG_JPEG_LENGTH, 0);
            }
            _ => {}
        }
    }

    // IFD1, when chained, carries the classic thumbnail pair.
    if ifd0.next != 0 {
        if let Ok(ifd1) = read_ifd(&mut r, ifd0.next as u64) {
            meta.offset_thumb_jpg = ifd1.value_or(TAG_JPEG_OFFSET, 0);
            meta.length_thumb_jpg = ifd1.value_or(TAG_JPEG_LENGTH, 0);
        }
    }

    if let Some(exif) = apply_exif_ifd(&mut r, &ifd0, 0, meta)? {
        let maker_offset = exif.value_or(TAG_MAKER_NOTE, 0);
        if maker_offset != 0 {
            decode_maker_note(&mut r, maker_offset as u64, meta);
        }
    }
    Ok(())
}

/// The Nikon maker note: "Nikon" signature, then a complete inner TIFF
/// header with its own byte order. All value offsets inside are relative to
/// the inner header's position; the first IFD sits at base + 8. The outer
/// endianness is restored on exit.
fn decode_maker_note(r: &mut Reader, offset: u64, meta: &mut ImageMetadata) {
    let base = match scan_for_inner_header(r, offset) {
        Some(b) => b,
        None => {
            log::debug!("{}: no inner maker-note header found", meta.file_path);
            return;
        }
    };

    let outer = r.endian;
    let inner = match r.detect_endian(base) {
        Ok(Some(e)) => e,
        _ => return,
    };
    r.endian = inner;

    let result = read_ifd(r, base + 8);
    let note = match result {
        Ok(ifd) => ifd,
        Err(_) => {
            r.endian = outer;
            return;
        }
    };
    for id in note.tags.keys() {
        log::trace!("nikon tag 0x{:04X} ({})", id, tags::describe(Namespace::Nikon, *id));
    }

    // EXIF BodySerialNumber may already be set; only a present maker-note
    // serial replaces it.
    let serial = string_tag(r, &note, TAG_SERIAL, base);
    if !serial.is_empty() {
        meta.camera_serial = serial;
    }
    meta.shutter_count = note.value_or(TAG_SHUTTER_COUNT, 0);
    resolve_lens(r, &note, base, meta);

    r.endian = outer;
}

/// Scan forward from the maker-note offset for the inner endianness marker
/// (the "Nikon" signature length varies across generations).
fn scan_for_inner_header(r: &mut Reader, offset: u64) -> Option<u64> {
    for delta in 0..MAKER_HEADER_SCAN {
        let mut probe = [0u8; 2];
        let bytes = r.bytes(offset + delta, 2).ok()?;
        probe.copy_from_slice(&bytes);
        let marker = u16::from_be_bytes(probe);
        if Endian::from_marker(marker).is_some() {
            return Some(offset + delta);
        }
    }
    None
}

fn resolve_lens(r: &mut Reader, note: &Ifd, base: u64, meta: &mut ImageMetadata) {
    let entry = match note.get(TAG_LENS_DATA) {
        Some(e) => *e,
        None => return,
    };
    if entry.count < 20 {
        return;
    }
    let data = match r.bytes(base + entry.value as u64, entry.count as usize) {
        Ok(d) => d,
        Err(_) => return,
    };
    let serial = numeric_prefix(&meta.camera_serial);
    let lens_type = note.value_or(TAG_LENS_TYPE, 0) as u8;
    let lens = nikon_lens::resolve(&data, serial, meta.shutter_count, lens_type);
    if !lens.is_empty() {
        meta.lens = lens;
    }
}

/// The decrypt key uses the serial number's leading digits as an integer.
fn numeric_prefix(s: &str) -> u32 {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_prefix_parses_digits_only() {
        assert_eq!(numeric_prefix("6012345"), 6012345);
        assert_eq!(numeric_prefix("3001234ab"), 3001234);
        assert_eq!(numeric_prefix("NO_DIGITS"), 0);
    }
}
