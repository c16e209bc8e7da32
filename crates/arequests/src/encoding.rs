//! Charset detection and strict body decoding

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_8};
use http::header::{HeaderMap, CONTENT_TYPE};

/// Character set a body is decoded with
///
/// WHATWG maps the ASCII and ISO-8859-1 labels onto windows-1252, which would
/// accept bytes the declared charset does not define. Those two are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Charset {
    /// Only bytes 0x00-0x7F are valid
    Ascii,
    /// Every byte maps to the code point of the same value
    Latin1,
    Whatwg(&'static Encoding),
}

const ASCII_LABELS: &[&str] = &["ascii", "us-ascii", "ansi_x3.4-1968", "iso646-us", "us", "cp367"];

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso_8859-1:1987",
    "latin1",
    "latin-1",
    "l1",
    "cp819",
    "ibm819",
    "iso-ir-100",
    "csisolatin1",
];

impl Charset {
    pub(crate) const UTF8: Charset = Charset::Whatwg(UTF_8);

    /// Resolve a `charset` label, `None` when the label is unknown
    pub(crate) fn for_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if ASCII_LABELS.contains(&label.as_str()) {
            Some(Charset::Ascii)
        } else if LATIN1_LABELS.contains(&label.as_str()) {
            Some(Charset::Latin1)
        } else {
            Encoding::for_label(label.as_bytes()).map(Charset::Whatwg)
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Charset::Ascii => "US-ASCII",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Whatwg(encoding) => encoding.name(),
        }
    }
}

/// Resolve the charset declared by the `Content-Type` header.
///
/// The `charset` parameter wins when it names a known encoding; otherwise UTF-8.
pub(crate) fn detect(headers: &HeaderMap) -> Charset {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return Charset::UTF8;
    };

    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        tracing::debug!(content_type, "unparsable Content-Type, decoding as UTF-8");
        return Charset::UTF8;
    };

    match mime.get_param(mime::CHARSET) {
        Some(label) => Charset::for_label(label.as_str()).unwrap_or_else(|| {
            tracing::debug!(charset = label.as_str(), "unknown charset, decoding as UTF-8");
            Charset::UTF8
        }),
        None => Charset::UTF8,
    }
}

/// Decode `bytes` with `charset`, failing on any malformed sequence.
pub(crate) fn decode_strict(bytes: &[u8], charset: Charset) -> Result<String> {
    let decoded = match charset {
        Charset::Ascii => bytes
            .is_ascii()
            .then(|| encoding_rs::mem::decode_latin1(bytes).into_owned()),
        Charset::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        Charset::Whatwg(encoding) => encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned()),
    };

    decoded.ok_or(Error::Decode {
        encoding: charset.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_detect_defaults_to_utf8() {
        assert_eq!(detect(&HeaderMap::new()), Charset::UTF8);
        assert_eq!(detect(&headers_with("application/json")), Charset::UTF8);
        assert_eq!(detect(&headers_with("%%%")), Charset::UTF8);
    }

    #[test]
    fn test_detect_charset_param() {
        let charset = detect(&headers_with("text/html; charset=shift_jis"));
        assert_eq!(charset.name(), "Shift_JIS");

        let charset = detect(&headers_with("text/plain; charset=windows-1252"));
        assert_eq!(charset.name(), "windows-1252");
    }

    #[test]
    fn test_detect_ascii_and_latin1_stay_distinct() {
        assert_eq!(detect(&headers_with("text/plain; charset=us-ascii")), Charset::Ascii);
        assert_eq!(detect(&headers_with("text/plain; charset=ASCII")), Charset::Ascii);
        assert_eq!(detect(&headers_with("text/plain; charset=ISO-8859-1")), Charset::Latin1);
        assert_eq!(detect(&headers_with("text/plain; charset=latin1")), Charset::Latin1);
    }

    #[test]
    fn test_detect_unknown_charset_falls_back() {
        assert_eq!(detect(&headers_with("text/plain; charset=klingon")), Charset::UTF8);
    }

    #[test]
    fn test_decode_strict_valid() {
        assert_eq!(decode_strict("héllo".as_bytes(), Charset::UTF8).unwrap(), "héllo");
        assert_eq!(decode_strict(b"plain", Charset::Ascii).unwrap(), "plain");
    }

    #[test]
    fn test_decode_strict_rejects_invalid_utf8() {
        let err = decode_strict(&[0x66, 0x6F, 0xFF, 0x6F], Charset::UTF8).unwrap_err();
        assert!(matches!(err, Error::Decode { encoding: "UTF-8" }));
    }

    #[test]
    fn test_decode_ascii_rejects_high_bytes() {
        let err = decode_strict(&[0x63, 0x61, 0x66, 0xE9], Charset::Ascii).unwrap_err();
        assert!(matches!(err, Error::Decode { encoding: "US-ASCII" }));
    }

    #[test]
    fn test_decode_latin1_maps_bytes_to_code_points() {
        assert_eq!(decode_strict(&[0x63, 0x61, 0x66, 0xE9], Charset::Latin1).unwrap(), "café");

        // 0x80 and 0x9F are C1 controls in Latin-1, not cp1252's euro sign and Ÿ
        let text = decode_strict(&[0x80, 0x9F], Charset::Latin1).unwrap();
        assert_eq!(text, "\u{80}\u{9F}");

        let cp1252 = detect(&headers_with("text/plain; charset=windows-1252"));
        assert_eq!(decode_strict(&[0x80], cp1252).unwrap(), "€");
    }
}
