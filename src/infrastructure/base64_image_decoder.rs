use std::io::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::domain::{
    error::{DomainError, StorageError},
    models::image::DecodedImage,
    services::image_service::ImageDecoder,
};

const UPLOAD_BASENAME: &str = "uploaded_image";
const TEMP_PREFIX: &str = "base64tofile";

#[derive(Clone, Default)]
pub struct Base64ImageDecoder;

impl Base64ImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// Drop a leading `data:<mime>;base64,` if the client sent a data URL
fn strip_data_url(payload: &str) -> &str {
    payload
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, data)| data)
        .unwrap_or(payload)
}

/// (extension, content type) from magic bytes, png when unrecognized
fn sniff_format(bytes: &[u8]) -> (&'static str, &'static str) {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        ("png", "image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ("jpg", "image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        ("gif", "image/gif")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        ("webp", "image/webp")
    } else {
        ("png", "image/png")
    }
}

impl ImageDecoder for Base64ImageDecoder {
    fn decode(&self, payload: &str) -> Result<DecodedImage, DomainError> {
        let data = strip_data_url(payload.trim());
        let bytes = STANDARD
            .decode(data)
            .map_err(|e| DomainError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(DomainError::Decode("empty image payload".to_string()));
        }

        let (extension, content_type) = sniff_format(&bytes);

        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile()
            .map_err(StorageError::from)?;
        file.write_all(&bytes).map_err(StorageError::from)?;
        file.flush().map_err(StorageError::from)?;

        debug!(
            "Decoded {} byte {} image into {}",
            bytes.len(),
            content_type,
            file.path().display()
        );

        Ok(DecodedImage::new(
            file,
            format!("{}.{}", UPLOAD_BASENAME, extension),
            extension,
            content_type,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

    #[test]
    fn test_decode_png_positive() {
        let payload = STANDARD.encode(PNG_BYTES);
        let image = Base64ImageDecoder::new().decode(&payload).unwrap();

        assert_eq!(image.original_name(), "uploaded_image.png");
        assert_eq!(image.extension(), "png");
        assert_eq!(image.content_type(), "image/png");
        assert_eq!(std::fs::read(image.path()).unwrap(), PNG_BYTES);
    }

    #[test]
    fn test_decode_data_url_jpeg_positive() {
        let jpeg: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];
        let payload = format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg));
        let image = Base64ImageDecoder::new().decode(&payload).unwrap();

        assert_eq!(image.original_name(), "uploaded_image.jpg");
        assert_eq!(image.content_type(), "image/jpeg");
        assert_eq!(std::fs::read(image.path()).unwrap(), jpeg);
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let payload = STANDARD.encode(PNG_BYTES);
        let image = Base64ImageDecoder::new().decode(&payload).unwrap();
        let path = image.path().to_path_buf();
        assert!(path.exists());

        drop(image);
        assert!(!path.exists());
    }

    #[test]
    fn test_decode_invalid_base64_negative() {
        let result = Base64ImageDecoder::new().decode("this is *not* base64!");
        assert!(matches!(result, Err(DomainError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_payload_negative() {
        let result = Base64ImageDecoder::new().decode("");
        assert!(matches!(result, Err(DomainError::Decode(_))));
    }
}
