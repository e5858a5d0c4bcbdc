//! Nikon lens identification: the maker-note LensData block is enciphered
//! with a deterministic stream cipher keyed by the camera serial number and
//! shutter count. The two 256-entry substitution tables are fixed published
//! constants. Decrypted bytes 12..20, concatenated with the raw lens-type
//! byte, key the lens-code table.

use std::collections::HashMap;

use lazy_static::lazy_static;

#[rustfmt::skip]
const XLAT0: [u8; 256] = [
    0xc1, 0xbf, 0x6d, 0x0d, 0x59, 0xc5, 0x13, 0x9d, 0x83, 0x61, 0x6b, 0x4f, 0xc7, 0x7f, 0x3d, 0x3d,
    0x53, 0x59, 0xe3, 0xc7, 0xe9, 0x2f, 0x95, 0xa7, 0x95, 0x1f, 0xdf, 0x7f, 0x2b, 0x29, 0xc7, 0x0d,
    0xdf, 0x07, 0xef, 0x71, 0x89, 0x3d, 0x13, 0x3d, 0x3b, 0x13, 0xfb, 0x0d, 0x89, 0xc1, 0x65, 0x1f,
    0xb3, 0x0d, 0x6b, 0x29, 0xe3, 0xfb, 0xef, 0xa3, 0x6b, 0x47, 0x7f, 0x95, 0x35, 0xa7, 0x47, 0x4f,
    0xc7, 0xf1, 0x59, 0x95, 0x35, 0x11, 0x29, 0x61, 0xf1, 0x3d, 0xb3, 0x2b, 0x0d, 0x43, 0x89, 0xc1,
    0x9d, 0x9d, 0x89, 0x65, 0xf1, 0xe9, 0xdf, 0xbf, 0x3d, 0x7f, 0x53, 0x97, 0xe5, 0xe9, 0x95, 0x17,
    0x1d, 0x3d, 0x8b, 0xfb, 0xc7, 0xe3, 0x67, 0xa7, 0x07, 0xf1, 0x71, 0xa7, 0x53, 0xb5, 0x29, 0x89,
    0xe5, 0x2b, 0xa7, 0x17, 0x29, 0xe9, 0x4f, 0xc5, 0x65, 0x6d, 0x6b, 0xef, 0x0d, 0x89, 0x49, 0x2f,
    0xb3, 0x43, 0x53, 0x65, 0x1d, 0x49, 0xa3, 0x13, 0x89, 0x59, 0xef, 0x6b, 0xef, 0x65, 0x1d, 0x0b,
    0x59, 0x13, 0xe3, 0x4f, 0x9d, 0xb3, 0x29, 0x43, 0x2b, 0x07, 0x1d, 0x95, 0x59, 0x59, 0x47, 0xfb,
    0xe5, 0xe9, 0x61, 0x47, 0x2f, 0x35, 0x7f, 0x17, 0x7f, 0xef, 0x7f, 0x95, 0x95, 0x71, 0xd3, 0xa3,
    0x0b, 0x71, 0xa3, 0xad, 0x0b, 0x3b, 0xb5, 0xfb, 0xa3, 0xbf, 0x4f, 0x83, 0x1d, 0xad, 0xe9, 0x2f,
    0x71, 0x65, 0xa3, 0xe5, 0x07, 0x35, 0x3d, 0x0d, 0xb5, 0xe9, 0xe5, 0x47, 0x3b, 0x9d, 0xef, 0x35,
    0xa3, 0xbf, 0xb3, 0xdf, 0x53, 0xd3, 0x97, 0x53, 0x49, 0x71, 0x07, 0x35, 0x61, 0x71, 0x2f, 0x43,
    0x2f, 0x11, 0xdf, 0x17, 0x97, 0xfb, 0x95, 0x3b, 0x7f, 0x6b, 0xd3, 0x25, 0xbf, 0xad, 0xc7, 0xc5,
    0xc5, 0xb5, 0x8b, 0xef, 0x2f, 0xd3, 0x07, 0x6b, 0x25, 0x49, 0x95, 0x25, 0x49, 0x6d, 0x71, 0xc7,
];

#[rustfmt::skip]
const XLAT1: [u8; 256] = [
    0xa7, 0xbc, 0xc9, 0xad, 0x91, 0xdf, 0x85, 0xe5, 0xd4, 0x78, 0xd5, 0x17, 0x46, 0x7c, 0x29, 0x4c,
    0x4d, 0x03, 0xe9, 0x25, 0x68, 0x11, 0x86, 0xb3, 0xbd, 0xf7, 0x6f, 0x61, 0x22, 0xa2, 0x26, 0x34,
    0x2a, 0xbe, 0x1e, 0x46, 0x14, 0x68, 0x9d, 0x44, 0x18, 0xc2, 0x40, 0xf4, 0x7e, 0x5f, 0x1b, 0xad,
    0x0b, 0x94, 0xb6, 0x67, 0xb4, 0x0b, 0xe1, 0xea, 0x95, 0x9c, 0x66, 0xdc, 0xe7, 0x5d, 0x6c, 0x05,
    0xda, 0xd5, 0xdf, 0x7a, 0xef, 0xf6, 0xdb, 0x1f, 0x82, 0x4c, 0xc0, 0x68, 0x47, 0xa1, 0xbd, 0xee,
    0x39, 0x50, 0x56, 0x4a, 0xdd, 0xdf, 0xa5, 0xf8, 0xc6, 0xda, 0xca, 0x90, 0xca, 0x01, 0x42, 0x9d,
    0x8b, 0x0c, 0x73, 0x43, 0x75, 0x05, 0x94, 0xde, 0x24, 0xb3, 0x80, 0x34, 0xe5, 0x2c, 0xdc, 0x9b,
    0x3f, 0xca, 0x33, 0x45, 0xd0, 0xdb, 0x5f, 0xf5, 0x52, 0xc3, 0x21, 0xda, 0xe2, 0x22, 0x72, 0x6b,
    0x3e, 0xd0, 0x5b, 0xa8, 0x87, 0x8c, 0x06, 0x5d, 0x0f, 0xdd, 0x09, 0x19, 0x93, 0xd0, 0xb9, 0xfc,
    0x8b, 0x0f, 0x84, 0x60, 0x33, 0x1c, 0x9b, 0x45, 0xf1, 0xf0, 0xa3, 0x94, 0x3a, 0x12, 0x77, 0x33,
    0x4d, 0x44, 0x78, 0x28, 0x3c, 0x9e, 0xfd, 0x65, 0x57, 0x16, 0x94, 0x6b, 0xfb, 0x59, 0xd0, 0xc8,
    0x22, 0x36, 0xdb, 0xd2, 0x63, 0x98, 0x43, 0xa1, 0x04, 0x87, 0x86, 0xf7, 0xa6, 0x26, 0xbb, 0xd6,
    0x59, 0x4d, 0xbf, 0x6a, 0x2e, 0xaa, 0x2b, 0xef, 0xe6, 0x78, 0xb6, 0x4e, 0xe0, 0x2f, 0xdc, 0x7c,
    0xbe, 0x57, 0x19, 0x32, 0x7e, 0x2a, 0xd0, 0xb8, 0xba, 0x29, 0x00, 0x3c, 0x52, 0x7d, 0xa8, 0x49,
    0x3b, 0x2d, 0xeb, 0x25, 0x49, 0xfa, 0xa3, 0xaa, 0x39, 0xa7, 0xc5, 0xa7, 0x50, 0x11, 0x36, 0xfb,
    0xc6, 0x67, 0x4a, 0xf5, 0xa5, 0x12, 0x65, 0x7e, 0xb0, 0xdf, 0xaf, 0x4e, 0xb3, 0x61, 0x7f, 0x2f,
];

/// Decipher a Nikon LensData block. The first 4 bytes are not encrypted.
/// The cipher is a pure XOR stream, so applying it twice restores the input.
pub fn decrypt(data: &[u8], serial: u32, shutter_count: u32) -> Vec<u8> {
    let key = shutter_count
        .to_be_bytes()
        .iter()
        .fold(0u8, |acc, b| acc ^ b);
    let ci = XLAT0[(serial & 0xFF) as usize];
    let mut cj = XLAT1[key as usize];
    let mut ck: u8 = 0x60;

    let mut out = data.to_vec();
    for byte in out.iter_mut().skip(4) {
        cj = cj.wrapping_add(ci.wrapping_mul(ck));
        ck = ck.wrapping_add(1);
        *byte ^= cj;
    }
    out
}

/// Build the lens-table key: decrypted bytes 12..20 plus the raw lens-type
/// byte, as space-separated hex pairs. `None` if the block is too short.
pub fn lens_key(decrypted: &[u8], lens_type: u8) -> Option<String> {
    if decrypted.len() < 20 {
        return None;
    }
    let mut parts: Vec<String> = decrypted[12..20]
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect();
    parts.push(format!("{:02X}", lens_type));
    Some(parts.join(" "))
}

/// Decrypt + key + table lookup; "" when the lens is not in the table.
pub fn resolve(data: &[u8], serial: u32, shutter_count: u32, lens_type: u8) -> String {
    let plain = decrypt(data, serial, shutter_count);
    lens_key(&plain, lens_type)
        .and_then(|key| {
            let name = LENS_NAMES.get(key.as_str()).copied();
            if name.is_none() {
                log::debug!("unknown lens code {}", key);
            }
            name
        })
        .unwrap_or_default()
        .to_string()
}

lazy_static! {
    /// Lens-code → lens-name table. Pure data, keyed by
    /// "LensID FStops MinFocal MaxFocal ApertureAtMin ApertureAtMax MCU LensType".
    /// Representative subset of the published Nikkor codes; extendable
    /// without touching any logic.
    static ref LENS_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("01 58 50 50 14 14 02 00 06", "AF Nikkor 50mm f/1.8"),
        ("02 42 44 5C 2A 34 02 00 06", "AF Zoom-Nikkor 35-70mm f/3.3-4.5"),
        ("06 54 53 53 24 24 06 00 06", "AF Micro-Nikkor 55mm f/2.8"),
        ("10 3C A0 A0 30 30 14 00 0E", "AF DC-Nikkor 300mm f/4"),
        ("11 44 5C 8E 34 42 15 00 06", "AF Zoom-Nikkor 70-210mm f/4-5.6"),
        ("18 40 44 72 2C 34 0E 00 06", "AF Zoom-Nikkor 35-135mm f/3.5-4.5 N"),
        ("25 48 44 5C 24 24 1B 02 02", "AF Zoom-Nikkor 35-70mm f/2.8D"),
        ("26 3C A0 A0 30 30 1C 02 0E", "AF Nikkor ED 300mm f/4 IF"),
        ("27 48 8E 8E 24 24 1D 02 0E", "AF-I Nikkor 300mm f/2.8D IF-ED"),
        ("2D 48 80 80 30 30 21 02 02", "AF Micro-Nikkor 200mm f/4D IF-ED"),
        ("2F 48 30 44 24 24 29 02 02", "AF Zoom-Nikkor 20-35mm f/2.8D IF"),
        ("32 54 6A 6A 24 24 35 02 02", "AF Micro-Nikkor 105mm f/2.8D"),
        ("36 48 37 37 24 24 3A 02 02", "AF Nikkor 24mm f/2.8D"),
        ("37 48 30 30 24 24 3B 02 02", "AF Nikkor 20mm f/2.8D"),
        ("38 4C 2D 2D 14 14 3C 02 02", "AF Nikkor 18mm f/2.8D"),
        ("3A 40 3C 5C 2C 34 3E 02 02", "AF Zoom-Nikkor 28-70mm f/3.5-4.5D"),
        ("3C 48 60 80 24 24 40 02 02", "AF Zoom-Nikkor 80-200mm f/2.8D ED"),
        ("3E 48 3C 3C 24 24 42 02 02", "AF Nikkor 28mm f/2.8D"),
        ("41 48 7C 7C 24 24 45 02 02", "AF Nikkor 180mm f/2.8D IF-ED"),
        ("42 54 44 44 18 18 46 02 02", "AF Nikkor 35mm f/2D"),
        ("43 54 50 50 0C 0C 47 02 02", "AF Nikkor 50mm f/1.4D"),
        ("44 44 60 80 34 3C 48 02 02", "AF Zoom-Nikkor 80-200mm f/4.5-5.6D"),
        ("48 48 8E 8E 24 24 4C 02 0E", "AF-S Nikkor 300mm f/2.8D IF-ED"),
        ("49 3C A6 A6 30 30 4D 02 0E", "AF-S Nikkor 500mm f/4D IF-ED"),
        ("4A 54 62 62 0C 0C 4E 02 02", "AF Nikkor 85mm f/1.4D IF"),
        ("4B 3C A0 A0 30 30 4F 02 0E", "AF-S Nikkor 400mm f/2.8D IF-ED"),
        ("4D 40 3C 80 2C 3C 62 02 02", "AF Zoom-Nikkor 28-200mm f/3.5-5.6D IF"),
        ("4E 48 72 72 18 18 51 02 02", "AF DC-Nikkor 135mm f/2D"),
        ("53 48 60 80 24 24 57 02 02", "AF Zoom-Nikkor 80-200mm f/2.8D ED"),
        ("54 44 5C 7C 34 3C 58 02 02", "AF Zoom-Micro Nikkor 70-180mm f/4.5-5.6D ED"),
        ("56 48 5C 8E 30 3C 5A 02 02", "AF Zoom-Nikkor 70-300mm f/4-5.6D ED"),
        ("59 48 98 98 24 24 5D 02 0E", "AF-S Nikkor 600mm f/4D IF-ED"),
        ("5A 3C 3E 56 30 3C 5E 06 02", "IX-Nikkor 30-60mm f/4-5.6"),
        ("5D 48 3C 5C 24 24 63 02 02", "AF-S Zoom-Nikkor 28-70mm f/2.8D IF-ED"),
        ("5E 48 60 80 24 24 64 02 02", "AF-S Zoom-Nikkor 80-200mm f/2.8D IF-ED"),
        ("5F 40 3C 6A 2C 34 65 02 02", "AF Zoom-Nikkor 28-105mm f/3.5-4.5D IF"),
        ("60 40 3C 60 2C 3C 66 02 02", "AF Zoom-Nikkor 28-80mm f/3.5-5.6D"),
        ("61 44 5E 86 34 3C 67 02 02", "AF Zoom-Nikkor 75-240mm f/4.5-5.6D"),
        ("63 48 2B 44 24 24 68 02 02", "AF-S Zoom-Nikkor 17-35mm f/2.8D IF-ED"),
        ("64 00 62 62 24 24 6A 02 02", "PC Micro-Nikkor 85mm f/2.8D"),
        ("65 44 60 98 34 3C 6B 0A 02", "AF VR Zoom-Nikkor 80-400mm f/4.5-5.6D ED"),
        ("66 40 2D 44 2C 34 6C 02 02", "AF Zoom-Nikkor 18-35mm f/3.5-4.5D IF-ED"),
        ("67 48 37 62 24 30 6D 02 02", "AF Zoom-Nikkor 24-85mm f/2.8-4D IF"),
        ("68 42 3C 60 2A 3C 6E 06 02", "AF Zoom-Nikkor 28-80mm f/3.3-5.6G"),
        ("69 48 5C 8E 30 3C 6F 06 02", "AF Zoom-Nikkor 70-300mm f/4-5.6G"),
        ("6A 48 8E 8E 30 30 70 02 0E", "AF-S Nikkor 300mm f/4D IF-ED"),
        ("6B 48 24 24 24 24 71 02 02", "AF Nikkor ED 14mm f/2.8D"),
        ("6D 48 8E 8E 24 24 73 02 0E", "AF-S Nikkor 300mm f/2.8D IF-ED II"),
        ("6E 48 98 98 24 24 74 02 0E", "AF-S Nikkor 600mm f/4D IF-ED II"),
        ("6F 3C A0 A0 30 30 75 02 0E", "AF-S Nikkor 400mm f/2.8D IF-ED II"),
        ("70 3C A6 A6 30 30 76 02 0E", "AF-S Nikkor 500mm f/4D IF-ED II"),
        ("72 48 4C 4C 24 24 77 00 02", "Nikkor 45mm f/2.8 P"),
        ("74 40 37 62 2C 34 78 06 0E", "AF-S Zoom-Nikkor 24-85mm f/3.5-4.5G IF-ED"),
        ("75 40 3C 68 2C 3C 79 06 02", "AF Zoom-Nikkor 28-100mm f/3.5-5.6G"),
        ("76 58 50 50 14 14 7A 02 02", "AF Nikkor 50mm f/1.8D"),
        ("77 48 5C 80 24 24 7B 0E 0E", "AF-S VR Zoom-Nikkor 70-200mm f/2.8G IF-ED"),
        ("78 40 37 6E 2C 3C 7C 0E 0E", "AF-S VR Zoom-Nikkor 24-120mm f/3.5-5.6G IF-ED"),
        ("79 40 3C 80 2C 3C 7F 06 02", "AF Zoom-Nikkor 28-200mm f/3.5-5.6G IF-ED"),
        ("7A 3C 1F 37 30 30 7E 06 0E", "AF-S DX Zoom-Nikkor 12-24mm f/4G IF-ED"),
        ("7B 48 80 98 30 30 80 0E 0E", "AF-S VR Zoom-Nikkor 200-400mm f/4G IF-ED"),
        ("7D 48 2B 53 24 24 82 06 0E", "AF-S DX Zoom-Nikkor 17-55mm f/2.8G IF-ED"),
        ("7F 40 2D 5C 2C 34 84 06 0E", "AF-S DX Zoom-Nikkor 18-70mm f/3.5-4.5G IF-ED"),
        ("80 48 1A 1A 24 24 85 06 0E", "AF DX Fisheye-Nikkor 10.5mm f/2.8G ED"),
        ("81 54 80 80 18 18 86 0E 0E", "AF-S VR Nikkor 200mm f/2G IF-ED"),
        ("82 48 8E 8E 24 24 87 0E 0E", "AF-S VR Nikkor 300mm f/2.8G IF-ED"),
        ("89 3C 53 80 30 3C 8B 06 0E", "AF-S DX Zoom-Nikkor 55-200mm f/4-5.6G ED"),
        ("8A 54 6A 6A 24 24 8C 0E 0E", "AF-S VR Micro-Nikkor 105mm f/2.8G IF-ED"),
        ("8B 40 2D 80 2C 3C 8D 0E 0E", "AF-S DX VR Zoom-Nikkor 18-200mm f/3.5-5.6G IF-ED"),
        ("8C 40 2D 53 2C 3C 8E 06 0E", "AF-S DX Zoom-Nikkor 18-55mm f/3.5-5.6G ED"),
        ("8D 44 5C 8E 34 3C 8F 0E 0E", "AF-S VR Zoom-Nikkor 70-300mm f/4.5-5.6G IF-ED"),
        ("8F 40 2D 72 2C 3C 91 06 0E", "AF-S DX Zoom-Nikkor 18-135mm f/3.5-5.6G IF-ED"),
        ("90 3B 53 80 30 3C 92 0E 0E", "AF-S DX VR Zoom-Nikkor 55-200mm f/4-5.6G IF-ED"),
        ("92 48 24 37 24 24 94 06 0E", "AF-S Zoom-Nikkor 14-24mm f/2.8G ED"),
        ("93 48 37 5C 24 24 95 06 0E", "AF-S Zoom-Nikkor 24-70mm f/2.8G ED"),
        ("94 40 2D 53 2C 3C 96 06 0E", "AF-S DX Zoom-Nikkor 18-55mm f/3.5-5.6G ED II"),
        ("96 48 98 98 24 24 98 0E 0E", "AF-S VR Nikkor 600mm f/4G ED"),
        ("97 3C A0 A0 30 30 99 0E 0E", "AF-S VR Nikkor 500mm f/4G ED"),
        ("98 48 8E 8E 24 24 9A 0E 0E", "AF-S VR Nikkor 400mm f/2.8G ED"),
        ("99 40 29 62 2C 3C 9B 0E 0E", "AF-S DX VR Zoom-Nikkor 16-85mm f/3.5-5.6G ED"),
        ("9A 40 2D 53 2C 3C 9C 0E 0E", "AF-S DX VR Zoom-Nikkor 18-55mm f/3.5-5.6G"),
        ("9B 54 4C 4C 24 24 9D 02 02", "PC-E Micro Nikkor 45mm f/2.8D ED"),
        ("9C 54 56 56 24 24 9E 06 0E", "AF-S Micro Nikkor 60mm f/2.8G ED"),
        ("9E 40 2D 6A 2C 3C A0 0E 0E", "AF-S DX VR Zoom-Nikkor 18-105mm f/3.5-5.6G ED"),
        ("9F 58 44 44 14 14 A1 06 0E", "AF-S DX Nikkor 35mm f/1.8G"),
        ("A0 54 50 50 0C 0C A2 06 0E", "AF-S Nikkor 50mm f/1.4G"),
        ("A1 40 18 37 2C 34 A3 06 0E", "AF-S DX Nikkor 10-24mm f/3.5-4.5G ED"),
        ("A2 48 5C 80 24 24 A4 0E 0E", "AF-S Nikkor 70-200mm f/2.8G ED VR II"),
        ("A3 3C 29 44 30 30 A5 0E 0E", "AF-S Nikkor 16-35mm f/4G ED VR"),
        ("A4 54 37 37 0C 0C A6 06 0E", "AF-S Nikkor 24mm f/1.4G ED"),
        ("A5 40 3C 8E 2C 3C A7 0E 0E", "AF-S Nikkor 28-300mm f/3.5-5.6G ED VR"),
        ("A6 48 8E 8E 24 24 A8 0E 0E", "AF-S Nikkor 300mm f/2.8G IF-ED VR II"),
        ("A7 4B 62 62 2C 2C A9 0E 0E", "AF-S DX Micro Nikkor 85mm f/3.5G ED VR"),
        ("A8 48 80 98 30 30 AA 0E 0E", "AF-S VR Zoom-Nikkor 200-400mm f/4G IF-ED II"),
        ("A9 54 80 80 18 18 AB 0E 0E", "AF-S Nikkor 200mm f/2G ED VR II"),
        ("AA 3C 37 6E 30 30 AC 0E 0E", "AF-S Nikkor 24-120mm f/4G ED VR"),
        ("AC 38 53 8E 34 3C AE 0E 0E", "AF-S DX Nikkor 55-300mm f/4.5-5.6G ED VR"),
        ("AD 3C 2D 8E 2C 3C AF 0E 0E", "AF-S DX Nikkor 18-300mm f/3.5-5.6G ED VR"),
        ("AE 54 62 62 0C 0C B0 06 0E", "AF-S Nikkor 85mm f/1.4G"),
        ("AF 54 44 44 0C 0C B1 06 0E", "AF-S Nikkor 35mm f/1.4G"),
        ("B0 4C 50 50 14 14 B2 06 0E", "AF-S Nikkor 50mm f/1.8G"),
        ("B1 48 48 48 24 24 B3 06 0E", "AF-S DX Micro Nikkor 40mm f/2.8G"),
        ("B2 48 5C 80 30 30 B4 0E 0E", "AF-S Nikkor 70-200mm f/4G ED VR"),
        ("B3 4C 62 62 14 14 B5 06 0E", "AF-S Nikkor 85mm f/1.8G"),
        ("B4 40 37 62 2C 34 B6 0E 0E", "AF-S Zoom-Nikkor 24-85mm f/3.5-4.5G IF-ED VR"),
        ("B5 4C 3C 3C 14 14 B7 06 0E", "AF-S Nikkor 28mm f/1.8G"),
        ("B6 3C B0 B0 3C 3C B8 0E 0E", "AF-S VR Nikkor 800mm f/5.6E FL ED"),
        ("B7 44 60 98 34 3C B9 0E 0E", "AF-S Nikkor 80-400mm f/4.5-5.6G ED VR"),
        ("B8 40 2D 44 2C 34 BA 06 0E", "AF-S Nikkor 18-35mm f/3.5-4.5G ED"),
        ("A0 40 2D 74 2C 3C BB 0E 0E", "AF-S DX Nikkor 18-140mm f/3.5-5.6G ED VR"),
        ("A1 54 55 55 0C 0C BC 06 0E", "AF-S Nikkor 58mm f/1.4G"),
        ("A4 40 2D 8E 2C 40 BF 0E 0E", "AF-S DX Nikkor 18-300mm f/3.5-6.3G ED VR"),
        ("A5 4C 44 44 14 14 C0 06 0E", "AF-S Nikkor 35mm f/1.8G ED"),
        ("A6 48 98 98 24 24 C1 0E 0E", "AF-S Nikkor 600mm f/4E FL ED VR"),
        ("A7 3C 53 80 30 3C C2 0E 0E", "AF-S DX Nikkor 55-200mm f/4-5.6G ED VR II"),
        ("A8 48 8E 8E 30 30 C3 4E 0E", "AF-S Nikkor 300mm f/4E PF ED VR"),
        ("A9 4C 31 31 14 14 C4 06 0E", "AF-S Nikkor 20mm f/1.8G ED"),
        ("AA 48 37 5C 24 24 C5 4E 0E", "AF-S Nikkor 24-70mm f/2.8E ED VR"),
        ("AB 3C A0 A0 30 30 C6 4E 0E", "AF-S Nikkor 500mm f/4E FL ED VR"),
        ("AC 3C A6 A6 30 30 C7 4E 0E", "AF-S Nikkor 600mm f/4E FL ED VR"),
        ("AD 48 28 60 24 30 C8 4E 0E", "AF-S DX Nikkor 16-80mm f/2.8-4E ED VR"),
        ("AE 3C 80 A0 3C 3C C9 4E 0E", "AF-S Nikkor 200-500mm f/5.6E ED VR"),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_four_bytes_pass_through() {
        let data: Vec<u8> = (0u8..32).collect();
        let out = decrypt(&data, 0x00345678, 0x00001234);
        assert_eq!(&out[..4], &data[..4]);
        assert_ne!(&out[4..], &data[4..]);
    }

    #[test]
    fn cipher_is_its_own_inverse() {
        let data: Vec<u8> = (0u8..64).map(|b| b.wrapping_mul(37)).collect();
        let once = decrypt(&data, 6012345, 24_580);
        let twice = decrypt(&once, 6012345, 24_580);
        assert_eq!(twice, data);
    }

    #[test]
    fn first_keystream_byte_matches_tables() {
        let serial = 0x0000_00ABu32;
        let count = 0x0102_0304u32;
        let key = 0x01 ^ 0x02 ^ 0x03 ^ 0x04u8;
        let ci = XLAT0[0xAB];
        let expected = XLAT1[key as usize].wrapping_add(ci.wrapping_mul(0x60));

        let out = decrypt(&[0u8; 8], serial, count);
        assert_eq!(out[4], expected);
    }

    #[test]
    fn keystream_known_answer() {
        // Worked out by hand from the substitution tables: serial low byte
        // 0x00 gives ci = XLAT0[0x00] = 0xC1, the shutter-count bytes XOR to
        // 0x00 so cj starts at XLAT1[0x00] = 0xA7, and ck counts up from
        // 0x60. Decrypting zeros exposes the keystream itself.
        let out = decrypt(&[0u8; 12], 6_012_160, 0x0101_0000);
        assert_eq!(
            out,
            [0, 0, 0, 0, 0x07, 0x28, 0x0A, 0xAD, 0x11, 0x36, 0x1C, 0xC3]
        );
    }

    #[test]
    fn lens_key_formats_bytes_twelve_to_twenty() {
        let mut plain = vec![0u8; 20];
        plain[12..20].copy_from_slice(&[0xB0, 0x4C, 0x50, 0x50, 0x14, 0x14, 0xB2, 0x06]);
        let key = lens_key(&plain, 0x0E).unwrap();
        assert_eq!(key, "B0 4C 50 50 14 14 B2 06 0E");
        assert_eq!(
            LENS_NAMES.get(key.as_str()).copied(),
            Some("AF-S Nikkor 50mm f/1.8G")
        );
    }

    #[test]
    fn short_block_has_no_key() {
        assert!(lens_key(&[0u8; 10], 0).is_none());
    }
}
