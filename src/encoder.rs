//! Turns a user-supplied image into an inline, base64-encoded payload.

use crate::{
    error::{Result, ViewsError},
    models::EncodedImage,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::{fs::File, io::Read, path::Path};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Identify an image format from its leading bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("image/tiff"),
        [_, _, _, _, b'f', b't', b'y', b'p', brand @ ..] if brand.len() >= 4 => {
            match &brand[..4] {
                b"avif" | b"avis" => Some("image/avif"),
                b"heic" | b"heix" | b"hevc" | b"hevx" => Some("image/heic"),
                b"mif1" | b"msf1" => Some("image/heif"),
                _ => None,
            }
        }
        [b'B', b'M', ..] if is_bmp(bytes) => Some("image/bmp"),
        _ => None,
    }
}

/// 14-byte file header followed by a DIB header of a known size.
fn is_bmp(bytes: &[u8]) -> bool {
    const DIB_HEADER_SIZES: [u32; 7] = [12, 40, 52, 56, 64, 108, 124];

    if bytes.len() < 18 {
        return false;
    }
    let u32_at =
        |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    let pixel_offset = u32_at(10);
    let dib_size = u32_at(14);

    DIB_HEADER_SIZES.contains(&dib_size) && pixel_offset >= 14 + dib_size
}

pub fn encode_bytes(bytes: &[u8]) -> Result<EncodedImage> {
    if bytes.is_empty() {
        return Err(ViewsError::DecodeError("image is empty".into()));
    }

    let mime_type = sniff_mime_type(bytes).ok_or_else(|| {
        ViewsError::DecodeError("unrecognized image format (no known MIME header)".into())
    })?;

    log::debug!(
        "Encoded {} bytes of {} as inline image data",
        bytes.len(),
        mime_type
    );

    Ok(EncodedImage::new(STANDARD.encode(bytes), mime_type))
}

pub fn encode_reader<R: Read>(mut reader: R) -> Result<EncodedImage> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ViewsError::DecodeError(format!("failed to read image: {}", e)))?;
    encode_bytes(&bytes)
}

pub fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ViewsError::DecodeError(format!("failed to open {}: {}", path.display(), e))
    })?;
    encode_reader(file)
}

/// Split a `data:<mime>;base64,<payload>` URL into an [`EncodedImage`].
pub fn decode_data_url(data_url: &str) -> Result<EncodedImage> {
    let (header, payload) = data_url
        .split_once(',')
        .filter(|(header, payload)| !header.is_empty() && !payload.is_empty())
        .ok_or_else(|| ViewsError::DecodeError("Invalid file format.".into()))?;

    let mime_type = header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|mime| !mime.is_empty() && header.contains(';'))
        .unwrap_or(FALLBACK_MIME);

    STANDARD
        .decode(payload)
        .map_err(|e| ViewsError::DecodeError(format!("invalid base64 payload: {}", e)))?;

    Ok(EncodedImage::new(payload, mime_type))
}

impl EncodedImage {
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        decode_data_url(data_url)
    }

    /// The precondition every remote request relies on.
    pub fn validate(&self) -> Result<()> {
        if self.payload.is_empty() {
            return Err(ViewsError::DecodeError("image payload is empty".into()));
        }
        if self.mime_type.is_empty() {
            return Err(ViewsError::DecodeError("image MIME type is missing".into()));
        }
        Ok(())
    }
}
