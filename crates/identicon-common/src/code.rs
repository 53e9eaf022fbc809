//! Deriving identicon codes and sizes from request input.
//!
//! The renderer only accepts a final 32-bit code. Frontends turn whatever
//! identifies the requester (an explicit code, a seed string, or the client
//! address) into that code here. The salt is carried by the [`CodeDeriver`]
//! value so different deployments produce different codes for the same
//! address without any process-wide state.

use crate::error::{IdenticonError, IdenticonResult};

/// Size used when the request does not specify one.
pub const DEFAULT_SIZE: u32 = 16;

/// Smallest size served to clients.
pub const MIN_SIZE: u32 = 16;

/// Largest size served to clients.
pub const MAX_SIZE: u32 = 64;

/// Salted hash from identifying strings to identicon codes.
#[derive(Debug, Clone)]
pub struct CodeDeriver {
    salt: String,
}

impl CodeDeriver {
    /// Create a deriver. The salt should be fairly long and must not be empty.
    pub fn new(salt: impl Into<String>) -> IdenticonResult<Self> {
        let salt = salt.into();
        if salt.is_empty() {
            return Err(IdenticonError::invalid("salt", "must not be empty"));
        }
        Ok(Self { salt })
    }

    /// Hash `input` with the salt and take the first 4 bytes, big-endian.
    pub fn derive(&self, input: &str) -> u32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(&[0]);
        hasher.update(input.as_bytes());
        let hash = hasher.finalize();
        let bytes = hash.as_bytes();
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Resolve the code for a request.
    ///
    /// A non-empty `param` that parses as a 32-bit decimal integer is used
    /// as-is (negative values wrap). Any other non-empty `param` is treated as
    /// a seed string. Without a param the client address is hashed.
    pub fn code_for(&self, param: Option<&str>, remote_addr: &str) -> u32 {
        match param.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => parse_code(p).unwrap_or_else(|| self.derive(p)),
            None => self.derive(remote_addr),
        }
    }
}

/// Parse an explicit code as a signed or unsigned 32-bit decimal.
pub fn parse_code(param: &str) -> Option<u32> {
    param
        .parse::<u32>()
        .ok()
        .or_else(|| param.parse::<i32>().ok().map(|v| v as u32))
}

/// Parse the requested size, falling back to [`DEFAULT_SIZE`] and clamping to
/// `[MIN_SIZE, MAX_SIZE]`.
pub fn parse_size(param: Option<&str>) -> u32 {
    param
        .and_then(|p| p.trim().parse::<i64>().ok())
        .map(|s| s.clamp(MIN_SIZE as i64, MAX_SIZE as i64) as u32)
        .unwrap_or(DEFAULT_SIZE)
}

/// Weak ETag for a rendered identicon.
///
/// Carries [`RENDER_FORMAT_VERSION`](crate::RENDER_FORMAT_VERSION) and the
/// operator's `cache_version` as separate fields.
pub fn etag(code: u32, size: u32, cache_version: u32) -> String {
    format!(
        "W/\"{:08x}-{}-v{}.{}\"",
        code,
        size,
        crate::RENDER_FORMAT_VERSION,
        cache_version
    )
}
