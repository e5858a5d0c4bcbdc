use crate::error::DecodeError;
use crate::formats::exif::{
    apply_exif_ifd, apply_ifd0, read_tiff_header, TAG_IPTC, TAG_JPEG_LENGTH, TAG_JPEG_OFFSET,
    TAG_PHOTOSHOP, TAG_STRIP_BYTE_COUNTS, TAG_STRIP_OFFSETS,
};
use crate::ifd::read_ifd;
use crate::iptc;
use crate::irb;
use crate::metadata::ImageMetadata;
use crate::primitive::{Endian, Reader};
use crate::source::ByteSource;

/// Generic TIFF: IFD0 dimensions and identity, IFD1 thumbnail, plus two
/// scans the RAW formats don't need: a Photoshop Image Resource Block
/// walk (tag 34377) for an embedded preview and an IPTC block (tag 33723)
/// for the title. All offsets are file-absolute (base 0), unlike the JPEG
/// EXIF pipeline.
pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let mut r = Reader::new(src, Endian::Little);
    let header = read_tiff_header(&mut r, 0)?;
    let ifd0 = read_ifd(&mut r, header.ifd0 as u64)?;
    apply_ifd0(&mut r, &ifd0, 0, meta);

    meta.offset_full_jpg = ifd0.value_or(TAG_JPEG_OFFSET, 0);
    meta.length_full_jpg = ifd0.value_or(TAG_JPEG_LENGTH, 0);
    if meta.length_full_jpg == 0 {
        meta.offset_full_jpg = ifd0.value_or(TAG_STRIP_OFFSETS, 0);
        meta.length_full_jpg = ifd0.value_or(TAG_STRIP_BYTE_COUNTS, 0);
    }

    if ifd0.next != 0 {
        if let Ok(ifd1) = read_ifd(&mut r, ifd0.next as u64) {
            meta.offset_thumb_jpg = ifd1.value_or(TAG_JPEG_OFFSET, 0);
            meta.length_thumb_jpg = ifd1.value_or(TAG_JPEG_LENGTH, 0);
        }
    }

    let irb_offset = ifd0.value_or(TAG_PHOTOSHOP, 0);
    if irb_offset != 0 {
        if let Some(range) = irb::find_thumbnail(&mut r, irb_offset as u64)? {
            meta.offset_small_jpg = range.offset;
            meta.length_small_jpg = range.length;
        }
    }

    if let Some(entry) = ifd0.get(TAG_IPTC).copied() {
        if entry.count > 0 {
            if let Some(title) = iptc::title_at(&mut r, entry.value as u64, entry.count as usize) {
                meta.title = title;
            }
        }
    }

    apply_exif_ifd(&mut r, &ifd0, 0, meta)?;
    Ok(())
}
