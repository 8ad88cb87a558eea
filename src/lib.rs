//! Stateless password-derivation identity core.
//!
//! This library models a named "site" whose password is computed on demand
//! from the user's master secret plus the site's own identity attributes,
//! rather than stored. It provides:
//! - The [`Site`] entity and its derivation contract
//! - Persistent vs incognito site variants
//! - The [`MasterKeyDeriver`] boundary the cryptographic collaborator
//!   implements
//! - Closed enumerations other components switch on

pub mod crypto;
pub mod model;
pub mod types;

pub use crypto::{DerivationError, MasterKey, MasterKeyDeriver};
pub use model::{Site, SiteVariant, User, UserRegistry};
pub use types::{AlgorithmVersion, KeyPurpose, ResultType, SiteCounter};

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, PassforgeError>;

/// General error type for the derivation model
#[derive(Error, Debug)]
pub enum PassforgeError {
    /// A site counter of 0 was supplied; counters start at 1.
    #[error("Invalid site counter: counter must be at least 1")]
    InvalidCounter,

    /// Failure raised by the derivation collaborator, surfaced unchanged.
    #[error(transparent)]
    Derivation(#[from] crypto::DerivationError),

    /// Two sites with the same name in one user's collection.
    #[error("A site named '{name}' already exists for this user")]
    IdentityConflict { name: String },

    #[error("No site named '{name}'")]
    SiteNotFound { name: String },

    #[error("Unknown user: {id}")]
    UnknownUser { id: uuid::Uuid },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
