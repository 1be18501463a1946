use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use watcher_logging::watcher_warn;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("listing body is not valid {encoding}")]
    Malformed { encoding: String },
}

/// Decodes a listing page body to UTF-8.
///
/// Order: byte-order mark, then the Content-Type charset, then detection.
/// The portal has served both UTF-8 and Latin-1 pages.
///
/// Invalid sequences are replaced with U+FFFD. Only a body in which nothing
/// but replacement characters and whitespace survives is an error.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<String, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(Some(b"de".as_slice()), true))
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        let readable = text
            .chars()
            .any(|c| c != char::REPLACEMENT_CHARACTER && !c.is_whitespace());
        if !readable {
            return Err(DecodeError::Malformed {
                encoding: encoding.name().to_string(),
            });
        }
        watcher_warn!("Replaced invalid {} sequences in listing body", encoding.name());
    }
    Ok(text.into_owned())
}
