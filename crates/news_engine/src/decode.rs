use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Bytes inspected when looking for a `<meta charset>` declaration.
const META_PRESCAN_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a fetched page to UTF-8: BOM, then Content-Type charset, then a
/// `<meta>` prescan of the document head, then chardetng detection.
///
/// Decoding is lossy; a stray invalid byte never hides the rest of the page.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes));
    if let Some(enc) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(&['"', '\''][..]);
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Finds `charset=` inside the first `<meta ...>` tags of the document; covers
/// both `<meta charset="x">` and the `http-equiv` Content-Type form.
fn charset_from_meta(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        let tag = &tag[..end];
        if let Some(pos) = tag.find("charset=") {
            let value: String = tag[pos + "charset=".len()..]
                .trim_start_matches(&['"', '\'', ' '][..])
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
                .collect();
            if !value.is_empty() {
                return Some(value);
            }
        }
        rest = &rest[start + end..];
    }
    None
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedHtml {
    let (text, _, had_errors) = enc.decode(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: enc.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::{charset_from_content_type, charset_from_meta, decode_html};

    #[test]
    fn content_type_charset_is_case_insensitive_and_unquoted() {
        assert_eq!(
            charset_from_content_type("text/html; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_from_content_type("text/html"), None);
    }

    #[test]
    fn meta_charset_is_found_in_both_forms() {
        assert_eq!(
            charset_from_meta(br#"<html><head><meta charset="windows-1252">"#),
            Some("windows-1252".to_string())
        );
        assert_eq!(
            charset_from_meta(
                br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#
            ),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(charset_from_meta(b"<meta name=\"x\" content=\"y\">"), None);
    }

    #[test]
    fn header_charset_wins_over_detection() {
        let decoded = decode_html(b"caf\xe9", Some("text/html; charset=ISO-8859-1"));
        assert_eq!(decoded.html, "caf\u{e9}");
    }

    #[test]
    fn meta_charset_used_without_header() {
        let mut bytes = br#"<meta charset="windows-1252"><title>caf"#.to_vec();
        bytes.extend_from_slice(b"\xe9</title>");
        let decoded = decode_html(&bytes, None);
        assert!(decoded.html.contains("caf\u{e9}"));
        assert_eq!(decoded.encoding_label, "windows-1252");
    }

    #[test]
    fn utf8_bom_is_honoured() {
        let decoded = decode_html(b"\xEF\xBB\xBFhello", Some("text/html"));
        assert_eq!(decoded.html, "hello");
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn malformed_bytes_are_replaced_not_rejected() {
        let decoded = decode_html(b"<title>ok</title>\xff", Some("text/html; charset=utf-8"));
        assert!(decoded.had_errors);
        assert_eq!(decoded.html, "<title>ok</title>\u{fffd}");
    }
}
