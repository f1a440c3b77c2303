// src/llm/image.rs
// Inline image encoding for vision requests

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Best-effort mime type from magic bytes; JPEG when unrecognised
pub fn sniff_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if image.starts_with(b"GIF8") {
        "image/gif"
    } else if image.len() >= 12 && &image[..4] == b"RIFF" && &image[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Encode raw image bytes as a `data:` URL
pub fn to_data_url(image: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(image), STANDARD.encode(image))
}
