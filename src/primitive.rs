use crate::error::DecodeError;
use crate::source::ByteSource;

/// TIFF byte-order marker values.
pub const MARKER_LITTLE: u16 = 0x4949;
pub const MARKER_BIG: u16 = 0x4D4D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Decode a raw 2-byte order marker (0x4949 = little, 0x4D4D = big).
    pub fn from_marker(marker: u16) -> Option<Endian> {
        match marker {
            MARKER_LITTLE => Some(Endian::Little),
            MARKER_BIG => Some(Endian::Big),
            _ => None,
        }
    }

    #[inline]
    pub fn u16_of(self, b: &[u8]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes([b[0], b[1]]),
            Endian::Big => u16::from_be_bytes([b[0], b[1]]),
        }
    }

    #[inline]
    pub fn u32_of(self, b: &[u8]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            Endian::Big => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
        }
    }
}

/// Endian-aware primitive reader over a `ByteSource`.
///
/// Endianness is a per-decode-session setting, detected once from the
/// stream's order marker. Maker-note sub-streams may swap it and must
/// restore the outer value afterward; decoders do that by saving and
/// reassigning `endian`.
pub struct Reader<'a> {
    src: &'a mut dyn ByteSource,
    pub endian: Endian,
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a mut dyn ByteSource, endian: Endian) -> Reader<'a> {
        Reader { src, endian }
    }

    pub fn len(&self) -> u64 {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn u8(&mut self, offset: u64) -> Result<u8, DecodeError> {
        let mut buf = [0u8; 1];
        self.src.read_at(offset, &mut buf)?;
        Ok(buf[0])
    }

    pub fn u16(&mut self, offset: u64) -> Result<u16, DecodeError> {
        let mut buf = [0u8; 2];
        self.src.read_at(offset, &mut buf)?;
        Ok(self.endian.u16_of(&buf))
    }

    pub fn u32(&mut self, offset: u64) -> Result<u32, DecodeError> {
        let mut buf = [0u8; 4];
        self.src.read_at(offset, &mut buf)?;
        Ok(self.endian.u32_of(&buf))
    }

    /// TIFF rational: two 4-byte integers, numerator over denominator.
    /// A zero denominator reads as 0.0, not an error.
    pub fn rational(&mut self, offset: u64) -> Result<f64, DecodeError> {
        let num = self.u32(offset)?;
        let den = self.u32(offset + 4)?;
        if den == 0 {
            Ok(0.0)
        } else {
            Ok(num as f64 / den as f64)
        }
    }

    pub fn bytes(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, DecodeError> {
        // Tag-declared counts are untrusted; check the span against the
        // stream before allocating.
        let available = self.src.len().saturating_sub(offset);
        if len as u64 > available {
            return Err(DecodeError::Truncated { offset });
        }
        let mut buf = vec![0u8; len];
        self.src.read_at(offset, &mut buf)?;
        Ok(buf)
    }

    /// ASCII string of `len` bytes; trailing NULs and whitespace trimmed.
    pub fn string(&mut self, offset: u64, len: usize) -> Result<String, DecodeError> {
        let raw = self.bytes(offset, len)?;
        Ok(trim_ascii(&raw))
    }

    /// Read a raw 2-byte order marker at `offset` without endian conversion
    /// (the marker bytes themselves define the endianness).
    pub fn detect_endian(&mut self, offset: u64) -> Result<Option<Endian>, DecodeError> {
        let mut buf = [0u8; 2];
        self.src.read_at(offset, &mut buf)?;
        Ok(Endian::from_marker(u16::from_be_bytes(buf)))
    }
}

/// Lossy ASCII conversion with NUL/whitespace trim, for tag strings.
pub fn trim_ascii(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim().to_string()
}
