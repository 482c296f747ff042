//! One-shot conversion of a local image file into a `data:` URL, used for
//! image messages and image avatars.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;

/// Larger files are refused; the whole payload travels inside a JSON body.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug)]
pub enum AttachmentError {
    Io(io::Error),
    TooLarge { bytes: u64 },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::Io(e) => write!(f, "could not read file: {e}"),
            AttachmentError::TooLarge { bytes } => write!(
                f,
                "file is {bytes} bytes, limit is {MAX_ATTACHMENT_BYTES}"
            ),
        }
    }
}

impl std::error::Error for AttachmentError {}

/// MIME type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads `path` and returns it as `data:<mime>;base64,<payload>`.
pub fn to_data_url(path: &Path) -> Result<String, AttachmentError> {
    let size = fs::metadata(path).map_err(AttachmentError::Io)?.len();
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { bytes: size });
    }
    let bytes = fs::read(path).map_err(AttachmentError::Io)?;
    debug!("Encoded attachment {} ({} bytes)", path.display(), bytes.len());
    Ok(encode_data_url(mime_for(path), &bytes))
}
