use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::errors::{ImportError, Result};

/// Texel filtering. Block-style art is point sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

/// Decoded RGBA8 texture.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub data: Vec<u8>,
    pub filter: FilterMode,
}

impl Texture {
    pub fn new_rgba8(name: impl Into<String>, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            data,
            filter: FilterMode::Nearest,
        }
    }

    /// Decodes an encoded image (PNG) from memory.
    pub fn from_encoded_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new_rgba8(name, width, height, rgba.into_raw()))
    }

    /// Decodes a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(name: impl Into<String>, uri: &str) -> Result<Self> {
        let bytes = decode_data_uri(uri)?;
        Self::from_encoded_bytes(name, &bytes)
    }
}

/// Extracts the payload of a base-64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImportError::DataUriError("missing `data:` scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImportError::DataUriError("missing `,` separator".into()))?;
    if !header.ends_with(";base64") {
        return Err(ImportError::DataUriError(format!(
            "unsupported encoding in {header:?}"
        )));
    }
    if header != "image/png;base64" {
        log::debug!("Embedded texture declares {header:?}, decoding by content");
    }
    Ok(STANDARD.decode(payload.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_requires_scheme() {
        assert!(matches!(
            decode_data_uri("image/png;base64,AAAA"),
            Err(ImportError::DataUriError(_))
        ));
    }

    #[test]
    fn data_uri_requires_base64_encoding() {
        assert!(matches!(
            decode_data_uri("data:text/plain,hello"),
            Err(ImportError::DataUriError(_))
        ));
    }

    #[test]
    fn data_uri_payload_is_decoded() {
        let bytes = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn garbage_image_fails_to_decode() {
        let err = Texture::from_encoded_bytes("t", b"not a png").unwrap_err();
        assert!(matches!(err, ImportError::ImageDecodeError(_)));
    }
}
