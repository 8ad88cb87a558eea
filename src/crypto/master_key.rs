//! Master key material.
//!
//! The master key is derived once from a user name and master password and
//! feeds every site-specific derivation. It is kept in memory only, zeroized
//! on drop, and never serialized.

use crate::types::AlgorithmVersion;
use std::fmt;
use zeroize::ZeroizeOnDrop;

/// Width of the master key material in bytes.
pub const MASTER_KEY_LEN: usize = 64;

/// Secret material derived from a user's name and master password.
///
/// Tagged with the [`AlgorithmVersion`] it was derived under so the deriver
/// can refuse to combine it with a site pinned to a different version.
#[derive(ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; MASTER_KEY_LEN],
    #[zeroize(skip)]
    version: AlgorithmVersion,
}

impl MasterKey {
    /// Wrap raw derived key material together with the version that
    /// produced it.
    pub fn from_bytes(bytes: [u8; MASTER_KEY_LEN], version: AlgorithmVersion) -> Self {
        Self { bytes, version }
    }

    /// The algorithm version this key was derived under.
    pub fn version(&self) -> AlgorithmVersion {
        self.version
    }

    /// Raw key material (use sparingly)
    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("version", &self.version)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_keeps_its_version() {
        let key = MasterKey::from_bytes([7u8; MASTER_KEY_LEN], AlgorithmVersion::V1);
        assert_eq!(key.version(), AlgorithmVersion::V1);
        assert_eq!(key.as_bytes(), &[7u8; MASTER_KEY_LEN]);
    }

    #[test]
    fn test_master_key_debug_redacts_material() {
        let key = MasterKey::from_bytes([0xAB; MASTER_KEY_LEN], AlgorithmVersion::CURRENT);
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("171")); // 0xAB
    }
}
