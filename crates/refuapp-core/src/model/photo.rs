// ── Photos captured for upload ──

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

/// A photo as produced by a camera or picker: base64 payload plus the
/// reported image format (`jpeg`, `png`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub base64: String,
    pub format: String,
}

impl Photo {
    pub fn new(base64: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
            format: format.into(),
        }
    }

    /// Encode raw image bytes (e.g. a file read from disk).
    pub fn from_bytes(bytes: &[u8], format: impl Into<String>) -> Self {
        Self::new(STANDARD.encode(bytes), format)
    }

    /// Decode the payload. A `data:` URL prefix is tolerated.
    pub fn decode(&self) -> Result<Bytes, base64::DecodeError> {
        let payload = self
            .base64
            .split_once(";base64,")
            .map_or(self.base64.as_str(), |(_, data)| data);
        STANDARD.decode(payload.trim()).map(Bytes::from)
    }

    /// `image/{format}`, lowercased.
    pub fn content_type(&self) -> String {
        format!("image/{}", self.format.to_ascii_lowercase())
    }

    /// Upload filename; the server assigns the stored name.
    pub fn file_name(&self) -> String {
        format!("photo.{}", self.format.to_ascii_lowercase())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bytes_survive_encoding() {
        let photo = Photo::from_bytes(b"raw image", "PNG");
        assert_eq!(&photo.decode().unwrap()[..], b"raw image");
        assert_eq!(photo.content_type(), "image/png");
        assert_eq!(photo.file_name(), "photo.png");
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let photo = Photo::new("data:image/jpeg;base64,aGk=", "jpeg");
        assert_eq!(&photo.decode().unwrap()[..], b"hi");
    }

    #[test]
    fn invalid_payload_fails_to_decode() {
        assert!(Photo::new("@@@", "jpeg").decode().is_err());
    }
}
