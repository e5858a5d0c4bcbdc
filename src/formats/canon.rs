use crate::error::DecodeError;
use crate::formats::exif::{
    apply_exif_ifd, apply_ifd0, read_tiff_header, TAG_JPEG_LENGTH, TAG_JPEG_OFFSET,
    TAG_MAKER_NOTE, TAG_STRIP_BYTE_COUNTS, TAG_STRIP_OFFSETS,
};
use crate::ifd::read_ifd;
use crate::metadata::ImageMetadata;
use crate::primitive::{Endian, Reader};
use crate::source::ByteSource;
use crate::tags::{self, Namespace};

const TAG_SERIAL: u16 = 0x000C;

/// CR2: IFD0 carries the full-size JPEG directly (strip offset/byte-count
/// pair), IFD1 the thumbnail. The maker note is a plain IFD in the outer
/// byte order with no base-offset adjustment.
pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let mut r = Reader::new(src, Endian::Little);
    let header = read_tiff_header(&mut r, 0)?;
    let ifd0 = read_ifd(&mut r, header.ifd0 as u64)?;
    apply_ifd0(&mut r, &ifd0, 0, meta);

    meta.offset_full_jpg = ifd0.value_or(TAG_STRIP_OFFSETS, 0);
    meta.length_full_jpg = ifd0.value_or(TAG_STRIP_BYTE_COUNTS, 0);

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
                        "canon tag 0x{:04X} ({})",
                        id,
                        tags::describe(Namespace::Canon, *id)
                    );
                }
                let serial = note.value_or(TAG_SERIAL, 0);
                if serial != 0 && meta.camera_serial.is_empty() {
                    meta.camera_serial = serial.to_string();
                }
            }
        }
    }
    Ok(())
}
