use crate::error::DecodeError;
use crate::formats::exif::{
    apply_exif_ifd, apply_ifd0, read_header_with_magics, TAG_MAKER_NOTE, TAG_STRIP_BYTE_COUNTS,
    TAG_STRIP_OFFSETS,
};
use crate::ifd::{read_ifd, string_tag, TYPE_LONG};
use crate::metadata::ImageMetadata;
use crate::primitive::{Endian, Reader};
use crate::source::ByteSource;
use crate::tags::{self, Namespace};

// ORF replaces the TIFF magic 42 with "RO"/"RS" variants.
const ORF_MAGICS: [u16; 3] = [42, 0x4F52, 0x5253];

// Olympus maker-note tags
const TAG_THUMBNAIL: u16 = 0x0100;
const TAG_PREVIEW_START: u16 = 0x0101;
const TAG_PREVIEW_LENGTH: u16 = 0x0102;
const TAG_MAKER_SERIAL: u16 = 0x0209;

/// ORF: TIFF structure behind an Olympus magic variant. The maker-note IFD
/// sits 12 bytes past the maker-note tag offset (the vendor header is not
/// an inner TIFF header); its value offsets stay file-absolute.
pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let mut r = Reader::new(src, Endian::Little);
    let header = read_header_with_magics(&mut r, 0, &ORF_MAGICS, "ORF")?;
    let ifd0 = read_ifd(&mut r, header.ifd0 as u64)?;
    apply_ifd0(&mut r, &ifd0, 0, meta);

    meta.offset_full_jpg = ifd0.value_or(TAG_STRIP_OFFSETS, 0);
    meta.length_full_jpg = ifd0.value_or(TAG_STRIP_BYTE_COUNTS, 0);

    if let Some(exif) = apply_exif_ifd(&mut r, &ifd0, 0, meta)? {
        let maker_offset = exif.value_or(TAG_MAKER_NOTE, 0);
        if maker_offset != 0 {
            decode_maker_note(&mut r, maker_offset as u64 + 12, meta);
        }
    }
    Ok(())
}

fn decode_maker_note(r: &mut Reader, ifd_offset: u64, meta: &mut ImageMetadata) {
    let note = match read_ifd(r, ifd_offset) {
        Ok(ifd) => ifd,
        Err(_) => return,
    };
    for id in note.tags.keys() {
        log::trace!(
            "olympus tag 0x{:04X} ({})",
            id,
            tags::describe(Namespace::Olympus, *id)
        );
    }

    // Undefined-typed thumbnail: value is the offset, count the byte length.
    if let Some(entry) = note.get(TAG_THUMBNAIL) {
        if entry.field_type != TYPE_LONG && entry.count > 4 {
            meta.offset_thumb_jpg = entry.value;
            meta.length_thumb_jpg = entry.count;
        }
    }
    let start = note.value_or(TAG_PREVIEW_START, 0);
    let length = note.value_or(TAG_PREVIEW_LENGTH, 0);
    if start != 0 && length != 0 {
        meta.offset_small_jpg = start;
        meta.length_small_jpg = length;
    }

    if meta.camera_serial.is_empty() {
        meta.camera_serial = string_tag(r, &note, TAG_MAKER_SERIAL, 0);
    }
}
