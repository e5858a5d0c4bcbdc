use crate::primitive::{trim_ascii, Endian, Reader};

const DATASET_MARKER: u8 = 0x1C;
const RECORD_APPLICATION: u8 = 2;
const DATASET_TITLE: u8 = 5; // ObjectName

/// Extract the title from raw IPTC-IIM dataset bytes.
///
/// Dataset layout: marker 0x1C, record number, dataset number, 2-byte
/// big-endian length, data. Stops at the first record 2 / dataset 5 hit.
pub fn title_from_datasets(data: &[u8]) -> Option<String> {
    let mut pos = 0;
    while pos + 5 <= data.len() {
        if data[pos] != DATASET_MARKER {
            pos += 1;
            continue;
        }
        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let length = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as usize;
        pos += 5;
        if pos + length > data.len() {
            break;
        }
        if record == RECORD_APPLICATION && dataset == DATASET_TITLE {
            let value = trim_ascii(&data[pos..pos + length]);
            if !value.is_empty() {
                return Some(value);
            }
        }
        pos += length;
    }
    None
}

/// Title from IPTC bytes referenced directly by a TIFF tag (tag 33723):
/// the datasets start right at the tag's offset.
pub fn title_at(r: &mut Reader, offset: u64, len: usize) -> Option<String> {
    let data = r.bytes(offset, len).ok()?;
    title_from_datasets(&data)
}

/// Title from a JPEG APP13 segment at `seg_offset`: locate the `8BIM`
/// resource marker inside the segment, skip the even-padded pascal resource
/// name, then scan the resource data for datasets.
pub fn title_from_segment(r: &mut Reader, seg_offset: u64) -> Option<String> {
    let outer = r.endian;
    r.endian = Endian::Big;
    let seg_len = r.u16(seg_offset + 2).ok();
    r.endian = outer;
    let seg_len = seg_len? as usize;
    if seg_len < 4 {
        return None;
    }

    let payload = r.bytes(seg_offset + 4, seg_len - 2).ok()?;
    let bim = payload.windows(4).position(|w| w == b"8BIM")?;

    // 8BIM(4) + resource id(2) + pascal name (even-padded) + data length(4)
    let mut pos = bim + 6;
    if pos >= payload.len() {
        return None;
    }
    let name_len = payload[pos] as usize;
    pos += 1 + name_len;
    if (1 + name_len) % 2 != 0 {
        pos += 1;
    }
    if pos + 4 > payload.len() {
        return None;
    }
    let data_len = u32::from_be_bytes([
        payload[pos],
        payload[pos + 1],
        payload[pos + 2],
        payload[pos + 3],
    ]) as usize;
    pos += 4;
    let end = (pos + data_len).min(payload.len());
    title_from_datasets(&payload[pos..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn dataset(record: u8, tag: u8, value: &[u8]) -> Vec<u8> {
        let mut v = vec![DATASET_MARKER, record, tag];
        v.extend_from_slice(&(value.len() as u16).to_be_bytes());
        v.extend_from_slice(value);
        v
    }

    #[test]
    fn record_two_dataset_five_is_title() {
        let mut data = dataset(2, 90, b"Berlin"); // city, skipped
        data.extend(dataset(2, 5, b"Winter light"));
        data.extend(dataset(2, 5, b"second title, never reached"));
        assert_eq!(title_from_datasets(&data).as_deref(), Some("Winter light"));
    }

    #[test]
    fn truncated_dataset_stops_cleanly() {
        let mut data = dataset(2, 90, b"x");
        data.extend_from_slice(&[DATASET_MARKER, 2, 5, 0xFF, 0xFF]); // length past end
        assert_eq!(title_from_datasets(&data), None);
    }

    #[test]
    fn app13_segment_with_padded_pascal_name() {
        let mut payload = Vec::new();
        payload.extend_from_slice(b"Photoshop 3.0\0");
        payload.extend_from_slice(b"8BIM");
        payload.extend_from_slice(&0x0404u16.to_be_bytes());
        payload.extend_from_slice(&[3]); // pascal name "abc" + pad to even
        payload.extend_from_slice(b"abc");
        let datasets = dataset(2, 5, b"Titled");
        payload.extend_from_slice(&(datasets.len() as u32).to_be_bytes());
        payload.extend_from_slice(&datasets);

        let mut data = vec![0xFF, 0xED];
        data.extend_from_slice(&((payload.len() as u16 + 2).to_be_bytes()));
        data.extend_from_slice(&payload);

        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Little);
        assert_eq!(title_from_segment(&mut r, 0).as_deref(), Some("Titled"));
    }
}
