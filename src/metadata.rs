use serde::{Deserialize, Serialize};

/// One decoded metadata record, keyed by file path in the store.
///
/// Every field has a defined default (0 / ""); absence of a tag in the file
/// is never an error condition. Only `error` communicates decode failure.
/// All stored preview offsets are absolute file offsets; any per-format
/// base (the JPEG EXIF block base in particular) is folded in before the
/// record is filled.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ImageMetadata {
    pub file_path: String,

    // Geometry
    pub width: u32,
    pub height: u32,
    /// EXIF orientation, 1 = normal.
    pub orientation: u16,
    /// Display string, e.g. "6000x4000".
    pub dimensions: String,

    // Embedded preview locations (byte ranges, not decoded pixels)
    pub offset_full_jpg: u32,
    pub length_full_jpg: u32,
    pub offset_small_jpg: u32,
    pub length_small_jpg: u32,
    pub offset_thumb_jpg: u32,
    pub length_thumb_jpg: u32,

    // Exposure
    pub created: String,
    pub exposure_time: String,
    pub exposure_time_num: f64,
    pub aperture: String,
    pub aperture_num: f64,
    pub iso: String,
    pub iso_num: u32,
    pub focal_length: String,
    pub focal_length_num: u32,

    // Identity / provenance
    pub make: String,
    pub model: String,
    pub lens: String,
    pub camera_serial: String,
    pub lens_serial: String,
    pub shutter_count: u32,

    // Descriptive (IPTC/XMP, opportunistic)
    pub title: String,
    pub creator: String,
    pub copyright: String,
    pub email: String,
    pub url: String,

    // Bookkeeping
    pub loaded: bool,
    pub error: Option<String>,
    /// Caller-settable selection flag; not touched by the decoders.
    pub picked: bool,
}

impl ImageMetadata {
    pub fn new(path: &str) -> Self {
        ImageMetadata {
            file_path: path.to_string(),
            orientation: 1,
            ..Default::default()
        }
    }

    /// Fill the dimensions display string from width/height.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if width > 0 && height > 0 {
            self.dimensions = format!("{}x{}", width, height);
        }
    }

    /// Apply the preview fallback chain: a missing thumbnail falls back to
    /// the small preview, which falls back to the full preview.
    pub fn resolve_preview_fallbacks(&mut self) {
        if self.offset_small_jpg == 0 {
            self.offset_small_jpg = self.offset_full_jpg;
            self.length_small_jpg = self.length_full_jpg;
        }
        if self.offset_thumb_jpg == 0 {
            self.offset_thumb_jpg = self.offset_small_jpg;
            self.length_thumb_jpg = self.length_small_jpg;
        }
    }
}
