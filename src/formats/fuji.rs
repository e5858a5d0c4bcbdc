use crate::error::DecodeError;
use crate::formats::jpeg;
use crate::metadata::ImageMetadata;
use crate::primitive::{Endian, Reader};
use crate::source::ByteSource;

const RAF_MAGIC: &[u8] = b"FUJIFILM";

// Fixed header positions of the embedded-JPEG locator pair, big-endian.
const JPEG_OFFSET_POS: u64 = 84;
const JPEG_LENGTH_POS: u64 = 88;

/// RAF is not TIFF-based: a fixed proprietary header names the byte range
/// of a complete embedded JPEG, which carries all the EXIF metadata and is
/// decoded through the shared JPEG pipeline. Stored offsets stay absolute
/// because the segment walk runs at the JPEG's real file position.
pub fn decode(src: &mut dyn ByteSource, meta: &mut ImageMetadata) -> Result<(), DecodeError> {
    let (jpeg_offset, jpeg_length) = {
        let mut r = Reader::new(src, Endian::Big);
        let magic = r.bytes(0, RAF_MAGIC.len())?;
        if magic != RAF_MAGIC {
            return Err(DecodeError::BadMagic("RAF"));
        }
        (r.u32(JPEG_OFFSET_POS)?, r.u32(JPEG_LENGTH_POS)?)
    };
    if jpeg_offset == 0 || jpeg_length == 0 {
        log::debug!("{}: RAF header names no embedded JPEG", meta.file_path);
        return Ok(());
    }

    jpeg::decode_at(src, meta, jpeg_offset as u64, jpeg_length)
}
