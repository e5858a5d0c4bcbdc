use crate::error::DecodeError;
use crate::formats::exif::{
    apply_exif_ifd, apply_ifd0, read_tiff_header, sub_ifd_offsets, TAG_JPEG_LENGTH,
    TAG_JPEG_OFFSET, TAG_MAKER_NOTE, TAG_STRIP_BYTE_COUNTS, TAG_STRIP_OFFSETS,
};
use crate::ifd::read_ifd;
use crate::metadata::ImageMetadata;
use crate::primitive::{Endian, Reader};
use crate::source::ByteSource;
use crate::tags::{self, Namespace};

/// ARW: Canon-style direct-offset layout. The full preview usually sits in
/// IFD0's strip pair, with a larger one sometimes behind a subIFD; the
/// thumbnail comes from IFD1. The maker note is a plain IFD, base 0.
pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let mut r = Reader::new(src, Endian::Little);
    let header = read_tiff_header(&mut r, 0)?;
    let ifd0 = read_ifd(&mut r, header.ifd0 as u64)?;
    apply_ifd0(&mut r, &ifd0, 0, meta);

    meta.offset_full_jpg = ifd0.value_or(TAG_STRIP_OFFSETS, 0);
    meta.length_full_jpg = ifd0.value_or(TAG_STRIP_BYTE_COUNTS, 0);
    if meta.length_full_jpg == 0 {
        meta.offset_full_jpg = ifd0.value_or(TAG_JPEG_OFFSET, 0);
        meta.length_full_jpg = ifd0.value_or(TAG_JPEG_LENGTH, 0);
    }

    // A subIFD preview, when present, is the larger rendition.
    for &offset in sub_ifd_offsets(&mut r, &ifd0, 0).iter().take(1) {
        if let Ok(sub) = read_ifd(&mut r, offset as u64) {
            let off = sub.value_or(TAG_JPEG_OFFSET, 0);
            let len = sub.value_or(TAG_JPEG_LENGTH, 0);
            if len > meta.length_full_jpg {
                meta.offset_small_jpg = meta.offset_full_jpg;
                meta.length_small_jpg = meta.length_full_jpg;
                meta.offset_full_jpg = off;
                meta.length_full_jpg = len;
            }
        }
    }

    if ifd0.next != 0 {
        if let Ok(ifd1) = read_ifd(&mut r, ifd0.next as u64) {
            meta.offset_thumb_jpg = ifd1.value_or(TAG_JPEG_OFFSET, 0);
            meta.length_thumb_jpg = ifd1.value_or(TAG_JPEG_LENGTH, 0);
        }
    }

    if let Some(exif) = apply_exif_ifd(&mut r, &ifd0, 0, meta)? {
        let maker_offset = exif.value_or(TAG_MAKER_NOTE, 0);
        if maker_offset != 0 {
            if let Ok(note) = read_ifd(&mut r, maker_offset as u64) {
                for id in note.tags.keys() {
                    log::trace!(
                        "sony tag 0x{:04X} ({})",
                        id,
                        tags::describe(Namespace::Sony, *id)
                    );
                }
            }
        }
    }
    Ok(())
}
