//! Derivation boundary.
//!
//! This module defines the contract the cryptographic collaborator
//! implements: master-key material, the deriver trait, and the failures it
//! may raise. The stretching transform itself lives behind the
//! [`MasterKeyDeriver`] trait and is not part of this crate.

pub mod deriver;
pub mod master_key;

pub use deriver::MasterKeyDeriver;
pub use master_key::{MasterKey, MASTER_KEY_LEN};

use crate::types::AlgorithmVersion;
use thiserror::Error;

/// Failures the derivation collaborator may raise.
///
/// The model propagates these unchanged; it performs no recovery and never
/// wraps or reinterprets them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Unsupported algorithm version: {0}")]
    UnsupportedVersion(AlgorithmVersion),

    #[error("Master key was derived under version {key}, site requires version {requested}")]
    VersionMismatch {
        key: AlgorithmVersion,
        requested: AlgorithmVersion,
    },

    #[error("Malformed master key: {0}")]
    MalformedMasterKey(String),

    #[error("Derivation failed: {0}")]
    Internal(String),
}

/// Result type for derivation operations
pub type Result<T> = std::result::Result<T, DerivationError>;
