use crate::primitive::Reader;

const PACKET_BEGIN: &str = "<?xpacket begin";
const PACKET_END: &str = "<?xpacket end";

/// How far past the segment offset we are willing to look for the packet.
const SEARCH_WINDOW: usize = 65536;

/// Descriptive fields pulled out of an XMP packet. Everything defaults to
/// ""; this is opportunistic extraction, not RDF parsing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct XmpFields {
    pub lens: String,
    pub creator: String,
    pub title: String,
    pub rights: String,
    pub email: String,
    pub url: String,
}

/// Locate the xpacket span within a bounded window from `seg_offset` and
/// extract the descriptive fields. Any failure yields empty fields.
pub fn extract(r: &mut Reader, seg_offset: u64) -> XmpFields {
    let available = r.len().saturating_sub(seg_offset);
    let window = (available as usize).min(SEARCH_WINDOW);
    let data = match r.bytes(seg_offset, window) {
        Ok(d) => d,
        Err(_) => return XmpFields::default(),
    };
    let text = String::from_utf8_lossy(&data);

    let begin = match text.find(PACKET_BEGIN) {
        Some(i) => i,
        None => return XmpFields::default(),
    };
    let end = match text[begin..].find(PACKET_END) {
        Some(i) => begin + i,
        None => return XmpFields::default(),
    };
    parse(&text[begin..end])
}

/// Extract the known fields from xpacket payload text: the lens and
/// contact-info attributes, and the character content of the dc elements.
pub fn parse(payload: &str) -> XmpFields {
    XmpFields {
        lens: attribute(payload, "aux:Lens"),
        creator: element_text(payload, "dc:creator"),
        title: element_text(payload, "dc:title"),
        rights: element_text(payload, "dc:rights"),
        email: first_non_empty(
            attribute(payload, "Iptc4xmpCore:CiEmailWork"),
            attribute(payload, "CiEmailWork"),
        ),
        url: first_non_empty(
            attribute(payload, "Iptc4xmpCore:CiUrlWork"),
            attribute(payload, "CiUrlWork"),
        ),
    }
}

fn first_non_empty(a: String, b: String) -> String {
    if a.is_empty() {
        b
    } else {
        a
    }
}

/// Value of `name="..."` anywhere in the payload; "" if absent.
fn attribute(payload: &str, name: &str) -> String {
    let pattern = format!("{}=\"", name);
    let start = match payload.find(&pattern) {
        Some(i) => i + pattern.len(),
        None => return String::new(),
    };
    match payload[start..].find('"') {
        Some(end) => payload[start..start + end].trim().to_string(),
        None => String::new(),
    }
}

/// First character content following the named element, skipping structural
/// tokens (tags) and whitespace-only runs.
fn element_text(payload: &str, name: &str) -> String {
    let open = format!("<{}", name);
    let start = match payload.find(&open) {
        Some(i) => i,
        None => return String::new(),
    };
    let close = format!("</{}>", name);
    let end = payload[start..]
        .find(&close)
        .map(|i| start + i)
        .unwrap_or(payload.len());

    let mut rest = &payload[start..end];
    loop {
        let lt = match rest.find('>') {
            Some(i) => i,
            None => return String::new(),
        };
        rest = &rest[lt + 1..];
        let run_end = rest.find('<').unwrap_or(rest.len());
        let run = rest[..run_end].trim();
        if !run.is_empty() {
            return run.to_string();
        }
        if run_end == rest.len() {
            return String::new();
        }
        rest = &rest[run_end..];
        // skip the next tag and keep looking
        match rest.find('>') {
            Some(_) => continue,
            None => return String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Endian;
    use crate::source::MemorySource;

    const SAMPLE: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description aux:Lens="AF-S Nikkor 24-70mm f/2.8G ED"
     Iptc4xmpCore:CiEmailWork="me@example.com"
     Iptc4xmpCore:CiUrlWork="https://example.com">
   <dc:creator><rdf:Seq><rdf:li>Jane Doe</rdf:li></rdf:Seq></dc:creator>
   <dc:title><rdf:Alt><rdf:li xml:lang="x-default">Dunes</rdf:li></rdf:Alt></dc:title>
   <dc:rights><rdf:Alt><rdf:li xml:lang="x-default">CC BY 4.0</rdf:li></rdf:Alt></dc:rights>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

    #[test]
    fn parses_all_fields() {
        let fields = parse(&SAMPLE[..SAMPLE.find(PACKET_END).unwrap()]);
        assert_eq!(fields.lens, "AF-S Nikkor 24-70mm f/2.8G ED");
        assert_eq!(fields.creator, "Jane Doe");
        assert_eq!(fields.title, "Dunes");
        assert_eq!(fields.rights, "CC BY 4.0");
        assert_eq!(fields.email, "me@example.com");
        assert_eq!(fields.url, "https://example.com");
    }

    #[test]
    fn extract_finds_packet_in_window() {
        let mut data = vec![0u8; 128]; // junk before the packet
        data.extend_from_slice(SAMPLE.as_bytes());
        let mut src = MemorySource::new(data);
        let mut r = Reader::new(&mut src, Endian::Big);
        let fields = extract(&mut r, 0);
        assert_eq!(fields.creator, "Jane Doe");
    }

    #[test]
    fn missing_packet_is_all_defaults() {
        let mut src = MemorySource::new(b"no xmp here".to_vec());
        let mut r = Reader::new(&mut src, Endian::Big);
        assert_eq!(extract(&mut r, 0), XmpFields::default());
    }
}
