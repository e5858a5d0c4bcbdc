//! Static tag dictionaries, one per namespace.
//!
//! These are diagnostic data only: decode logic addresses tags by numeric id
//! and never consults these maps. They back trace logging and the CLI's
//! `--describe-tags` output.

use std::collections::HashMap;

use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Ifd,
    Exif,
    Nikon,
    Canon,
    Olympus,
    Sony,
    Fuji,
}

impl Namespace {
    pub fn parse(name: &str) -> Option<Namespace> {
        match name.to_lowercase().as_str() {
            "ifd" | "tiff" => Some(Namespace::Ifd),
            "exif" => Some(Namespace::Exif),
            "nikon" => Some(Namespace::Nikon),
            "canon" => Some(Namespace::Canon),
            "olympus" => Some(Namespace::Olympus),
            "sony" => Some(Namespace::Sony),
            "fuji" => Some(Namespace::Fuji),
            _ => None,
        }
    }
}

lazy_static! {
    static ref IFD_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x0100, "ImageWidth"),
        (0x0101, "ImageHeight"),
        (0x0103, "Compression"),
        (0x010E, "ImageDescription"),
        (0x010F, "Make"),
        (0x0110, "Model"),
        (0x0111, "StripOffsets"),
        (0x0112, "Orientation"),
        (0x0117, "StripByteCounts"),
        (0x011A, "XResolution"),
        (0x011B, "YResolution"),
        (0x0131, "Software"),
        (0x0132, "DateTime"),
        (0x013B, "Artist"),
        (0x014A, "SubIFDs"),
        (0x0201, "JPEGInterchangeFormat"),
        (0x0202, "JPEGInterchangeFormatLength"),
        (0x8298, "Copyright"),
        (0x83BB, "IPTC-NAA"),
        (0x8649, "PhotoshopSettings"),
        (0x8769, "ExifIFDPointer"),
    ]);

    static ref EXIF_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x829A, "ExposureTime"),
        (0x829D, "FNumber"),
        (0x8822, "ExposureProgram"),
        (0x8827, "ISOSpeedRatings"),
        (0x9003, "DateTimeOriginal"),
        (0x9004, "DateTimeDigitized"),
        (0x9201, "ShutterSpeedValue"),
        (0x9202, "ApertureValue"),
        (0x9204, "ExposureBiasValue"),
        (0x920A, "FocalLength"),
        (0x927C, "MakerNote"),
        (0x9286, "UserComment"),
        (0xA002, "PixelXDimension"),
        (0xA003, "PixelYDimension"),
        (0xA405, "FocalLengthIn35mmFilm"),
        (0xA431, "BodySerialNumber"),
        (0xA434, "LensModel"),
        (0xA435, "LensSerialNumber"),
    ]);

    static ref NIKON_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x0001, "MakerNoteVersion"),
        (0x0002, "ISO"),
        (0x0004, "Quality"),
        (0x0005, "WhiteBalance"),
        (0x0011, "PreviewIFD"),
        (0x001D, "SerialNumber"),
        (0x0083, "LensType"),
        (0x0084, "Lens"),
        (0x008C, "ContrastCurve"),
        (0x0097, "ColorBalance"),
        (0x0098, "LensData"),
        (0x00A7, "ShutterCount"),
        (0x00A8, "FlashInfo"),
    ]);

    static ref CANON_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x0001, "CameraSettings"),
        (0x0002, "FocalLength"),
        (0x0004, "ShotInfo"),
        (0x0006, "ImageType"),
        (0x0007, "FirmwareVersion"),
        (0x0009, "OwnerName"),
        (0x000C, "SerialNumber"),
        (0x0095, "LensModel"),
        (0x00B6, "PreviewImageInfo"),
    ]);

    static ref OLYMPUS_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x0100, "ThumbnailImage"),
        (0x0101, "PreviewImageStart"),
        (0x0102, "PreviewImageLength"),
        (0x0207, "CameraType"),
        (0x0209, "SerialNumber"),
        (0x2010, "Equipment"),
        (0x2020, "CameraSettings"),
    ]);

    static ref SONY_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x0102, "Quality"),
        (0x0104, "FlashExposureComp"),
        (0x2001, "PreviewImage"),
        (0xB000, "FileFormat"),
        (0xB001, "SonyModelID"),
        (0xB02A, "LensSpec"),
    ]);

    static ref FUJI_TAGS: HashMap<u16, &'static str> = HashMap::from([
        (0x0000, "Version"),
        (0x0010, "InternalSerialNumber"),
        (0x1000, "Quality"),
        (0x1002, "WhiteBalance"),
        (0x1404, "MinFocalLength"),
        (0x1405, "MaxFocalLength"),
    ]);
}

pub fn dictionary(ns: Namespace) -> &'static HashMap<u16, &'static str> {
    match ns {
        Namespace::Ifd => &IFD_TAGS,
        Namespace::Exif => &EXIF_TAGS,
        Namespace::Nikon => &NIKON_TAGS,
        Namespace::Canon => &CANON_TAGS,
        Namespace::Olympus => &OLYMPUS_TAGS,
        Namespace::Sony => &SONY_TAGS,
        Namespace::Fuji => &FUJI_TAGS,
    }
}

pub fn describe(ns: Namespace, id: u16) -> &'static str {
    dictionary(ns).get(&id).copied().unwrap_or("unknown")
}
