use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::TokenError;

/// Byte length of single-use tokens (43 characters once encoded).
pub const SINGLE_USE_TOKEN_BYTES: usize = 32;

/// Generate an opaque, URL-safe random token.
///
/// Reads `byte_length` bytes from the operating system CSPRNG and encodes
/// them as unpadded base64url, so the result can be embedded in a link
/// without escaping.
///
/// # Errors
/// * `EntropyUnavailable` - The OS random source failed
pub fn new_token(byte_length: usize) -> Result<String, TokenError> {
    let mut bytes = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::EntropyUnavailable(e.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
