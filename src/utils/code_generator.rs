//! Short code generation.
//!
//! Stateless and safe for concurrent use. Performs no collision detection;
//! callers absorb duplicate-key outcomes from whichever backend is bound.

use base64::Engine as _;

use crate::error::StoreError;

/// Code length used by the storage facade for auto-generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Generates a cryptographically secure random short code of exactly
/// `length` characters.
///
/// Fills `length` bytes from the OS entropy source, encodes them as URL-safe
/// base64 without padding, and truncates to `length` characters.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] when `length` is zero and
/// [`StoreError::TransientIo`] if the system random source fails.
pub fn generate_code(length: usize) -> Result<String, StoreError> {
    if length == 0 {
        return Err(StoreError::invalid_input(
            "code length must be greater than 0",
        ));
    }

    let mut buffer = vec![0u8; length];
    getrandom::fill(&mut buffer)
        .map_err(|e| StoreError::transient_io(format!("system rng failure: {e}")))?;

    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buffer);

    // base64 yields ceil(4n/3) ASCII chars, always enough to truncate.
    Ok(encoded[..length].to_string())
}
