use crate::error::DecodeError;
use crate::formats::exif::{
    apply_exif_ifd, apply_ifd0, read_tiff_header, TAG_JPEG_LENGTH, TAG_JPEG_OFFSET,
};
use crate::ifd::read_ifd;
use crate::iptc;
use crate::metadata::ImageMetadata;
use crate::primitive::{Endian, Reader};
use crate::segments::{self, SOI};
use crate::source::ByteSource;
use crate::xmp;

pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let len = src.len() as u32;
    decode_at(src, meta, 0, len)
}

/// JPEG pipeline, shared with RAF (which embeds a complete JPEG at a fixed
/// container offset). `soi` is the absolute position of the SOI marker and
/// `container_len` the byte length of the JPEG stream.
///
/// A JFIF file with no EXIF segment is metadata-free: dimensions come from
/// the SOF0 frame header and decoding stops there. Otherwise the EXIF block
/// is parsed exactly like a TIFF file, except that every offset inside it is
/// relative to the block's own endianness-marker position, which is folded
/// into each stored offset (TIFF files use base 0; the asymmetry is
/// deliberate and load-bearing).
pub(crate) fn decode_at(
    src: &mut dyn ByteSource,
    meta: &mut ImageMetadata,
    soi: u64,
    container_len: u32,
) -> Result<(), DecodeError> {
    let mut r = Reader::new(src, Endian::Big);
    if r.u16(soi)? != SOI {
        return Err(DecodeError::BadMagic("JPEG"));
    }

    let segments = segments::scan(&mut r, soi + 2)?;

    // The JPEG stream itself is the full-size image.
    meta.offset_full_jpg = soi as u32;
    meta.length_full_jpg = container_len;

    if let Some(&sof) = segments.get("SOF0") {
        let (w, h) = segments::sof_dimensions(&mut r, sof)?;
        meta.set_dimensions(w, h);
    }

    let exif_seg = match segments.get("EXIF") {
        Some(&seg) => seg,
        None => {
            if segments.contains_key("JFIF") {
                log::debug!("{}: JFIF with no EXIF block, metadata-free", meta.file_path);
            }
            return Ok(());
        }
    };

    // marker(2) + length(2) + "Exif\0\0"(6) puts the endianness marker of
    // the embedded TIFF structure at +10; that position is the base every
    // offset in the block is relative to.
    let base = exif_seg + 10;
    let header = read_tiff_header(&mut r, base)?;
    let ifd0 = read_ifd(&mut r, base + header.ifd0 as u64)?;
    apply_ifd0(&mut r, &ifd0, base, meta);

    if ifd0.next != 0 {
        let ifd1 = read_ifd(&mut r, base + ifd0.next as u64)?;
        let thumb = ifd1.value_or(TAG_JPEG_OFFSET, 0);
        if thumb != 0 {
            meta.offset_thumb_jpg = thumb + base as u32;
            meta.length_thumb_jpg = ifd1.value_or(TAG_JPEG_LENGTH, 0);
        }
    }

    apply_exif_ifd(&mut r, &ifd0, base, meta)?;

    if meta.title.is_empty() {
        if let Some(&iptc_seg) = segments.get("IPTC") {
            if let Some(title) = iptc::title_from_segment(&mut r, iptc_seg) {
                meta.title = title;
            }
        }
    }
    if let Some(&xmp_seg) = segments.get("XMP") {
        let fields = xmp::extract(&mut r, xmp_seg);
        if meta.lens.is_empty() {
            meta.lens = fields.lens;
        }
        if meta.title.is_empty() {
            meta.title = fields.title;
        }
        meta.creator = fields.creator;
        meta.copyright = fields.rights;
        meta.email = fields.email;
        meta.url = fields.url;
    }
    Ok(())
}
