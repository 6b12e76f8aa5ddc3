//! # Base64 Decoding
//!
//! Key material is commonly shipped through the environment as base64-encoded PEM,
//! so these helpers use the standard (padded) alphabet.

use base64::{Engine as _, engine::general_purpose};

/// Decode a standard base64 string to bytes.
///
/// Surrounding whitespace and embedded newlines are ignored.
pub fn b64_decode(b64: &str) -> Result<Vec<u8>, Error> {
    let compact: String = b64.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD
        .decode(compact)
        .map_err(|_| Error::FailToB64Decode)
}

/// Decode a standard base64 string to a UTF-8 string.
pub fn b64_decode_to_string(b64: &str) -> Result<String, Error> {
    b64_decode(b64)
        .and_then(|bytes| String::from_utf8(bytes).map_err(|_| Error::FailToB64Decode))
}

// region:    --- Error
#[derive(Debug, PartialEq)]
pub enum Error {
    FailToB64Decode,
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pem_with_line_breaks() {
        // "-----BEGIN KEY-----" split across lines
        let encoded = "LS0tLS1CRUdJTiBL\nRVktLS0tLQ==\n";
        assert_eq!(
            b64_decode_to_string(encoded).expect("valid base64 should decode"),
            "-----BEGIN KEY-----"
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(b64_decode("not base64 !!"), Err(Error::FailToB64Decode));
    }
}
