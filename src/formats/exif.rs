//! Shared TIFF/EXIF sub-steps used by every vendor decoder: header
//! detection, IFD0/EXIF field extraction, and the display formatting rules.

use crate::error::DecodeError;
use crate::ifd::{rational_tag, read_ifd, string_tag, Ifd};
use crate::metadata::ImageMetadata;
use crate::primitive::Reader;
use crate::tags::{self, Namespace};

// IFD0 / generic TIFF tags
pub const TAG_IMAGE_WIDTH: u16 = 0x0100;
pub const TAG_IMAGE_HEIGHT: u16 = 0x0101;
pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_STRIP_OFFSETS: u16 = 0x0111;
pub const TAG_ORIENTATION: u16 = 0x0112;
pub const TAG_STRIP_BYTE_COUNTS: u16 = 0x0117;
pub const TAG_DATETIME: u16 = 0x0132;
pub const TAG_SUB_IFDS: u16 = 0x014A;
pub const TAG_JPEG_OFFSET: u16 = 0x0201;
pub const TAG_JPEG_LENGTH: u16 = 0x0202;
pub const TAG_IPTC: u16 = 0x83BB;
pub const TAG_PHOTOSHOP: u16 = 0x8649;
pub const TAG_EXIF_IFD: u16 = 0x8769;

// EXIF IFD tags
pub const TAG_EXPOSURE_TIME: u16 = 0x829A;
pub const TAG_FNUMBER: u16 = 0x829D;
pub const TAG_ISO: u16 = 0x8827;
pub const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
pub const TAG_FOCAL_LENGTH: u16 = 0x920A;
pub const TAG_MAKER_NOTE: u16 = 0x927C;
pub const TAG_PIXEL_X: u16 = 0xA002;
pub const TAG_PIXEL_Y: u16 = 0xA003;
pub const TAG_BODY_SERIAL: u16 = 0xA431;
pub const TAG_LENS_MODEL: u16 = 0xA434;
pub const TAG_LENS_SERIAL: u16 = 0xA435;

const TIFF_MAGIC: u16 = 42;

#[derive(Debug, Clone, Copy)]
pub struct TiffHeader {
    pub ifd0: u32,
}

/// Detect endianness from the order marker at `base`, set it on the reader,
/// and validate the magic number. `base` is 0 for TIFF-family files and the
/// EXIF block position for JPEG.
pub fn read_tiff_header(r: &mut Reader, base: u64) -> Result<TiffHeader, DecodeError> {
    read_header_with_magics(r, base, &[TIFF_MAGIC], "TIFF")
}

/// Same as `read_tiff_header` but accepting vendor magic variants
/// (Olympus ORF uses 0x4F52 / 0x5352 in place of 42).
pub fn read_header_with_magics(
    r: &mut Reader,
    base: u64,
    magics: &[u16],
    label: &'static str,
) -> Result<TiffHeader, DecodeError> {
    let endian = r
        .detect_endian(base)?
        .ok_or(DecodeError::BadMagic(label))?;
    r.endian = endian;
    let magic = r.u16(base + 2)?;
    if !magics.contains(&magic) {
        return Err(DecodeError::BadMagic(label));
    }
    Ok(TiffHeader {
        ifd0: r.u32(base + 4)?,
    })
}

/// Pull the common IFD0 fields into the record. `base` is folded into every
/// tag-value offset resolved here.
pub fn apply_ifd0(r: &mut Reader, ifd: &Ifd, base: u64, meta: &mut ImageMetadata) {
    let make = string_tag(r, ifd, TAG_MAKE, base);
    if !make.is_empty() {
        meta.make = make;
    }
    let model = string_tag(r, ifd, TAG_MODEL, base);
    if !model.is_empty() {
        meta.model = model;
    }
    meta.orientation = ifd.tag_or(TAG_ORIENTATION, 1u16, |e| Some(e.value as u16));
    let created = string_tag(r, ifd, TAG_DATETIME, base);
    if !created.is_empty() {
        meta.created = created;
    }
    let width = ifd.value_or(TAG_IMAGE_WIDTH, 0);
    let height = ifd.value_or(TAG_IMAGE_HEIGHT, 0);
    if width > 0 && height > 0 {
        meta.set_dimensions(width, height);
    }
}

/// Read the EXIF sub-IFD (pointer tag in `ifd0`) and pull exposure,
/// identity, and dimension fields into the record. Returns the parsed EXIF
/// IFD so vendor decoders can chase the maker note out of it.
pub fn apply_exif_ifd(
    r: &mut Reader,
    ifd0: &Ifd,
    base: u64,
    meta: &mut ImageMetadata,
) -> Result<Option<Ifd>, DecodeError> {
    let exif_offset = ifd0.value_or(TAG_EXIF_IFD, 0);
    if exif_offset == 0 {
        return Ok(None);
    }
    let exif = read_ifd(r, base + exif_offset as u64)?;
    for id in exif.tags.keys() {
        log::trace!("exif tag 0x{:04X} ({})", id, tags::describe(Namespace::Exif, *id));
    }

    if let Some(x) = rational_tag(r, &exif, TAG_EXPOSURE_TIME, base) {
        let (text, num) = format_exposure(x);
        meta.exposure_time = text;
        meta.exposure_time_num = num;
    }
    if let Some(f) = rational_tag(r, &exif, TAG_FNUMBER, base) {
        let (text, num) = format_aperture(f);
        meta.aperture = text;
        meta.aperture_num = num;
    }
    if let Some(e) = exif.get(TAG_ISO) {
        let iso = e.value;
        meta.iso = iso.to_string();
        meta.iso_num = iso;
    }
    if let Some(f) = rational_tag(r, &exif, TAG_FOCAL_LENGTH, base) {
        let (text, num) = format_focal_length(f);
        meta.focal_length = text;
        meta.focal_length_num = num;
    }
    let created = string_tag(r, &exif, TAG_DATETIME_ORIGINAL, base);
    if !created.is_empty() {
        meta.created = created;
    }
    if meta.lens.is_empty() {
        meta.lens = string_tag(r, &exif, TAG_LENS_MODEL, base);
    }
    if meta.camera_serial.is_empty() {
        meta.camera_serial = string_tag(r, &exif, TAG_BODY_SERIAL, base);
    }
    if meta.lens_serial.is_empty() {
        meta.lens_serial = string_tag(r, &exif, TAG_LENS_SERIAL, base);
    }
    if meta.width == 0 {
        let w = exif.value_or(TAG_PIXEL_X, 0);
        let h = exif.value_or(TAG_PIXEL_Y, 0);
        if w > 0 && h > 0 {
            meta.set_dimensions(w, h);
        }
    }
    Ok(Some(exif))
}

/// Collect the subIFD offsets declared by tag 330: inline when a single
/// offset, otherwise a u32 array at the tag's offset.
pub fn sub_ifd_offsets(r: &mut Reader, ifd: &Ifd, base: u64) -> Vec<u32> {
    let entry = match ifd.get(TAG_SUB_IFDS) {
        Some(e) => *e,
        None => return Vec::new(),
    };
    let count = entry.count as usize;
    if count == 0 || count > 16 {
        return Vec::new();
    }
    if count == 1 {
        return vec![entry.value];
    }
    let mut offsets = Vec::with_capacity(count);
    for i in 0..count {
        match r.u32(base + entry.value as u64 + (i as u64) * 4) {
            Ok(off) => offsets.push(off),
            Err(_) => break,
        }
    }
    offsets
}

/// Exposure seconds → `"1/200 sec"` / `"2 sec"`. The numeric companion
/// carries the reciprocal for sub-second exposures (200 for 1/200) and
/// whole seconds otherwise.
pub fn format_exposure(x: f64) -> (String, f64) {
    if x <= 0.0 {
        return (String::new(), 0.0);
    }
    if x < 1.0 {
        let recip = (1.0 / x).round();
        (format!("1/{} sec", recip), recip)
    } else {
        let secs = x.round();
        (format!("{} sec", secs as u64), secs)
    }
}

/// F-number → `"f/2.8"`, numeric rounded to one decimal.
pub fn format_aperture(f: f64) -> (String, f64) {
    if f <= 0.0 {
        return (String::new(), 0.0);
    }
    let rounded = (f * 10.0).round() / 10.0;
    (format!("f/{:.1}", rounded), rounded)
}

/// Focal length → `"35mm"`, numeric truncated.
pub fn format_focal_length(f: f64) -> (String, u32) {
    if f <= 0.0 {
        return (String::new(), 0);
    }
    (format!("{}mm", f.round() as u32), f.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposure_fraction() {
        assert_eq!(format_exposure(1.0 / 200.0), ("1/200 sec".to_string(), 200.0));
    }

    #[test]
    fn exposure_whole_seconds() {
        assert_eq!(format_exposure(2.0), ("2 sec".to_string(), 2.0));
    }

    #[test]
    fn exposure_absent() {
        assert_eq!(format_exposure(0.0), (String::new(), 0.0));
    }

    #[test]
    fn aperture_one_decimal() {
        assert_eq!(format_aperture(2.8), ("f/2.8".to_string(), 2.8));
        assert_eq!(format_aperture(28.0 / 10.0), ("f/2.8".to_string(), 2.8));
        assert_eq!(format_aperture(9.0), ("f/9.0".to_string(), 9.0));
    }

    #[test]
    fn focal_rounds_text_truncates_number() {
        assert_eq!(format_focal_length(34.6), ("35mm".to_string(), 34));
        assert_eq!(format_focal_length(50.0), ("50mm".to_string(), 50));
    }
}
