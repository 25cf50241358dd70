use sha2::{Digest, Sha256};
use std::fmt;

use crate::Error;

/// content-address of an object: SHA-256 of its exact serialized bytes, hex-encoded.
///
/// Hashing the exact stored bytes is what makes the store content-addressed —
/// two objects with identical payloads collapse to the same hash (O1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// hash of the empty byte string, useful as a sentinel for "no commits yet"
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// parse from a 64-character hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHashHex(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| Error::InvalidHashHex(s.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// try to parse `s` as a hash, without raising an error if it isn't one
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_hex(s).ok()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// compute the content-address of a byte slice
    pub fn of(content: &[u8]) -> Self {
        Self(Sha256::digest(content).into())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..12])
    }
}
