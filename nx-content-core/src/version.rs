//! Version encoding.
//!
//! Versions show up either as dotted `major.minor.patch` strings or as an
//! already-encoded integer (`major·65536 + minor·256 + patch`). The encoded
//! form is what the version-history map is keyed by.

use crate::error::CoreError;

/// An encoded version integer.
pub type EncodedVersion = u32;

/// Encode a version string.
///
/// Accepts `"1.2.0"`, `"1.2"`, `"v1.2.0"`, or a bare decimal integer which is
/// taken as already encoded. Minor and patch must be below 256.
pub fn encode_version(raw: &str) -> Result<EncodedVersion, CoreError> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(CoreError::invalid_version(raw));
    }

    if !trimmed.contains('.') {
        return trimmed
            .parse::<EncodedVersion>()
            .map_err(|_| CoreError::invalid_version(raw));
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() > 3 {
        return Err(CoreError::invalid_version(raw));
    }
    let mut nums = [0u32; 3];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u32>()
            .map_err(|_| CoreError::invalid_version(raw))?;
    }
    let [major, minor, patch] = nums;
    if minor > 0xFF || patch > 0xFF || major > 0xFFFF {
        return Err(CoreError::invalid_version(raw));
    }
    Ok((major << 16) | (minor << 8) | patch)
}

/// Decode an encoded version back into `major.minor.patch`.
pub fn decode_version(encoded: EncodedVersion) -> String {
    format!(
        "{}.{}.{}",
        encoded >> 16,
        (encoded >> 8) & 0xFF,
        encoded & 0xFF
    )
}

#[cfg(test)]
#[path = "tests/version_tests.rs"]
mod tests;
