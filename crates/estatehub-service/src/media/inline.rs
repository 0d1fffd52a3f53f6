//! Classification of body image strings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// How a string from a request body's `images` array is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyImage<'a> {
    /// Already hosted; stored as is.
    Hosted(&'a str),
    /// Base64 image data with any `data:` prefix removed.
    Inline(&'a str),
}

/// Classify `value`.
///
/// A data URI, or any non-`http` string longer than `threshold`, is inline
/// image data.
pub fn classify(value: &str, threshold: usize) -> BodyImage<'_> {
    if value.starts_with("data:image") || (!value.starts_with("http") && value.len() > threshold) {
        BodyImage::Inline(strip_data_uri(value))
    } else {
        BodyImage::Hosted(value)
    }
}

/// Remove a leading `data:image/<word>;base64,`.
pub fn strip_data_uri(value: &str) -> &str {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return value;
    };
    let Some((subtype, payload)) = rest.split_once(";base64,") else {
        return value;
    };
    if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        payload
    } else {
        value
    }
}

/// Whether `payload` decodes as standard base64.
pub fn is_valid_base64(payload: &str) -> bool {
    !payload.is_empty() && STANDARD.decode(payload.trim()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("https://i.ibb.co/x.png", 100),
            BodyImage::Hosted("https://i.ibb.co/x.png")
        );
        assert_eq!(
            classify("data:image/png;base64,AAAA", 100),
            BodyImage::Inline("AAAA")
        );
        let long = "A".repeat(101);
        assert_eq!(classify(&long, 100), BodyImage::Inline(long.as_str()));
        assert_eq!(classify("short", 100), BodyImage::Hosted("short"));
        let long_url = format!("http://{}", "a".repeat(200));
        assert_eq!(classify(&long_url, 100), BodyImage::Hosted(long_url.as_str()));
    }

    #[test]
    fn test_strip_requires_word_subtype() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("data:image/svg+xml;base64,QUJD"), "data:image/svg+xml;base64,QUJD");
        assert_eq!(strip_data_uri("QUJD"), "QUJD");
    }

    #[test]
    fn test_base64_check() {
        assert!(is_valid_base64("aGVsbG8="));
        assert!(!is_valid_base64("not base64!"));
        assert!(!is_valid_base64(""));
    }
}
