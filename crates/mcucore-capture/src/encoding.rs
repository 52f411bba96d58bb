use encoding_rs::UTF_8;
use std::borrow::Cow;

use crate::error::{CaptureError, Result};

/// Decodes one received line as UTF-8, refusing to substitute replacement
/// characters for malformed sequences.
pub fn decode_line(bytes: &[u8]) -> Result<Cow<'_, str>> {
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| CaptureError::Decode {
            len: bytes.len(),
            hex: hex::encode_upper(bytes),
        })
}
