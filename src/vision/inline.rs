// Inline image encoding

use super::models::{validate_image_size, ImageFormat};
use crate::error::{RelayError, Result};
use crate::models::AnalysisRequest;
use base64::Engine;

/// Media type browsers send when they cannot tell what a file is.
const GENERIC_MEDIA_TYPE: &str = "application/octet-stream";

/// A validated image ready to be embedded in an upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub format: ImageFormat,
    /// Base64 payload, standard alphabet with padding.
    pub data: String,
}

impl InlineImage {
    /// Validate an upload and encode it.
    ///
    /// A missing or generic declared media type is resolved from magic bytes.
    pub fn prepare(request: &AnalysisRequest) -> Result<Self> {
        let bytes = &request.image_bytes;
        if bytes.is_empty() {
            return Err(RelayError::InvalidRequest(
                "Uploaded image is empty".to_string(),
            ));
        }

        validate_image_size(bytes.len()).map_err(RelayError::PayloadTooLarge)?;

        let format = resolve_format(request.media_type.as_deref(), bytes)?;

        Ok(Self {
            format,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Render as `data:<mime>;base64,<payload>`.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.data)
    }
}

fn resolve_format(declared: Option<&str>, bytes: &[u8]) -> Result<ImageFormat> {
    match declared.map(str::trim).filter(|mt| !mt.is_empty()) {
        Some(mt) if !mt.eq_ignore_ascii_case(GENERIC_MEDIA_TYPE) => ImageFormat::from_mime_type(mt)
            .ok_or_else(|| RelayError::InvalidRequest(format!("Unsupported image format: {}", mt))),
        _ => ImageFormat::sniff(bytes).ok_or_else(|| {
            RelayError::InvalidRequest("Could not detect image format from data".to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tiny 1x1 PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    fn png_bytes() -> Vec<u8> {
        base64::engine::general_purpose::STANDARD.decode(PNG_B64).unwrap()
    }

    #[test]
    fn test_prepare_declared_png() {
        let request = AnalysisRequest::new(png_bytes(), Some("image/png".to_string()));
        let image = InlineImage::prepare(&request).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.data, PNG_B64);
        assert_eq!(image.data_url(), format!("data:image/png;base64,{}", PNG_B64));
    }

    #[test]
    fn test_prepare_detects_missing_media_type() {
        let request = AnalysisRequest::new(png_bytes(), None);
        let image = InlineImage::prepare(&request).unwrap();
        assert_eq!(image.format, ImageFormat::Png);

        let request = AnalysisRequest::new(png_bytes(), Some("application/octet-stream".to_string()));
        assert_eq!(InlineImage::prepare(&request).unwrap().format, ImageFormat::Png);
    }

    #[test]
    fn test_prepare_rejects_unsupported_type() {
        let request = AnalysisRequest::new(png_bytes(), Some("image/bmp".to_string()));
        let err = InlineImage::prepare(&request).unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)));
        assert!(err.to_string().contains("image/bmp"));
    }

    #[test]
    fn test_prepare_rejects_empty_upload() {
        let request = AnalysisRequest::new(Vec::new(), Some("image/jpeg".to_string()));
        assert!(matches!(
            InlineImage::prepare(&request),
            Err(RelayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_prepare_rejects_undetectable_bytes() {
        let request = AnalysisRequest::new(b"not an image at all".to_vec(), None);
        assert!(InlineImage::prepare(&request).is_err());
    }

    #[test]
    fn test_prepare_rejects_oversized_upload() {
        let mut bytes = vec![0u8; super::super::MAX_IMAGE_SIZE_BYTES + 1];
        bytes[..3].copy_from_slice(b"\xFF\xD8\xFF");
        let request = AnalysisRequest::new(bytes, Some("image/jpeg".to_string()));
        assert!(matches!(
            InlineImage::prepare(&request),
            Err(RelayError::PayloadTooLarge(_))
        ));
    }
}
