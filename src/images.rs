//! Decoding of base64 data-URL image payloads (`data:image/png;base64,...`),
//! the upload format used for avatars and recipe images.

use base64::Engine;

pub struct DecodedImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

const ALLOWED_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Parses a `data:<media-type>;base64,<payload>` string into content type
/// and raw bytes. Only common raster image types are accepted.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, String> {
    let rest = input
        .strip_prefix("data:")
        .ok_or_else(|| "Expected a data: URL".to_string())?;

    let (content_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| "Expected base64-encoded image data".to_string())?;

    if !ALLOWED_TYPES.contains(&content_type) {
        return Err(format!("Unsupported image type \"{}\"", content_type));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| "Invalid base64 image data".to_string())?;

    if data.is_empty() {
        return Err("Image data is empty".to_string());
    }

    Ok(DecodedImage {
        content_type: content_type.to_string(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decodes_png_data_url() {
        let url = format!("data:image/png;base64,{}", PNG_B64);
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.content_type, "image/png");
        assert_eq!(&decoded.data[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_rejects_missing_prefix() {
        assert!(decode_data_url(PNG_B64).is_err());
        assert!(decode_data_url("http://example.com/a.png").is_err());
    }

    #[test]
    fn test_rejects_non_image_media_type() {
        let url = format!("data:text/plain;base64,{}", PNG_B64);
        assert!(decode_data_url(&url).is_err());
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert!(decode_data_url("data:image/png;base64,!!!not-base64!!!").is_err());
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert!(decode_data_url("data:image/png;base64,").is_err());
    }
}
