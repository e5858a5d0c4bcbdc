//! Vendor decode dispatch: lower-cased file extension → one decode routine.
//!
//! Every routine composes the same pieces (ByteSource + IFD walk + segment
//! walk) into a full `ImageMetadata` record and never raises a hard failure:
//! an early stop (bad magic, truncated file) lands in `record.error` with
//! whatever fields were populated up to that point.

pub mod exif;

mod canon;
mod fuji;
mod jpeg;
mod nikon;
mod olympus;
mod sony;
mod tiff;

use std::path::Path;

use crate::error::DecodeError;
use crate::metadata::ImageMetadata;
use crate::source::ByteSource;

/// Every extension the dispatcher recognizes; discovery allow-lists default
/// to this set so the two never drift apart.
pub const KNOWN_EXTENSIONS: [&str; 12] = [
    "nef", "nrw", "cr2", "orf", "arw", "srf", "sr2", "raf", "tif", "tiff", "jpg", "jpeg",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Nikon,
    Canon,
    Olympus,
    Sony,
    Fuji,
    Tiff,
    Jpeg,
}

impl Vendor {
    /// Case-insensitive extension dispatch; `None` means no decode is
    /// attempted at all.
    pub fn from_extension(ext: &str) -> Option<Vendor> {
        match ext.to_lowercase().as_str() {
            "nef" | "nrw" => Some(Vendor::Nikon),
            "cr2" => Some(Vendor::Canon),
            "orf" => Some(Vendor::Olympus),
            "arw" | "srf" | "sr2" => Some(Vendor::Sony),
            "raf" => Some(Vendor::Fuji),
            "tif" | "tiff" => Some(Vendor::Tiff),
            "jpg" | "jpeg" => Some(Vendor::Jpeg),
            _ => None,
        }
    }

    /// RAW formats must carry an embedded preview; its absence after all
    /// fallbacks is reported through `record.error`.
    pub fn is_raw(self) -> bool {
        !matches!(self, Vendor::Tiff | Vendor::Jpeg)
    }
}

/// Resolve the vendor for a path, or `FormatUnsupported` without reading
/// any bytes.
pub fn vendor_for_path(path: &Path) -> Result<Vendor, DecodeError> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    Vendor::from_extension(ext)
        .ok_or_else(|| DecodeError::FormatUnsupported(ext.to_lowercase()))
}

/// Run one decode over an already-open source. Always returns a record;
/// failures are folded into `record.error`.
pub fn decode_source(vendor: Vendor, src: &mut dyn ByteSource, path: &str) -> ImageMetadata {
    let mut meta = ImageMetadata::new(path);
    let result = match vendor {
        Vendor::Nikon => nikon::decode(src, &mut meta),
        Vendor::Canon => canon::decode(src, &mut meta),
        Vendor::Olympus => olympus::decode(src, &mut meta),
        Vendor::Sony => sony::decode(src, &mut meta),
        Vendor::Fuji => fuji::decode(src, &mut meta),
        Vendor::Tiff => tiff::decode(src, &mut meta),
        Vendor::Jpeg => jpeg::decode(src, &mut meta),
    };
    meta.loaded = true;
    if let Err(e) = result {
        log::warn!("decode of {} stopped early: {}", path, e);
        meta.error = Some(e.record_message());
    }

    meta.resolve_preview_fallbacks();
    if meta.error.is_none() && vendor.is_raw() && meta.length_full_jpg == 0 {
        meta.error = Some("no embedded preview found".to_string());
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        assert_eq!(Vendor::from_extension("NEF"), Some(Vendor::Nikon));
        assert_eq!(Vendor::from_extension("Cr2"), Some(Vendor::Canon));
        assert_eq!(Vendor::from_extension("jpeg"), Some(Vendor::Jpeg));
        assert_eq!(Vendor::from_extension("xyz"), None);
    }

    #[test]
    fn every_known_extension_dispatches() {
        for ext in KNOWN_EXTENSIONS {
            assert!(Vendor::from_extension(ext).is_some(), "{}", ext);
        }
    }

    #[test]
    fn unsupported_extension_is_typed() {
        let err = vendor_for_path(Path::new("/p/file.png")).unwrap_err();
        assert!(matches!(err, DecodeError::FormatUnsupported(ref e) if e == "png"));
    }
}
