//! The deriver trait implemented by the cryptographic collaborator.

use crate::crypto::{MasterKey, Result};
use crate::types::{AlgorithmVersion, KeyPurpose, ResultType, SiteCounter};

/// Deterministic derivation collaborator.
///
/// Implementations must be pure: identical inputs yield identical outputs,
/// indefinitely, across process restarts and platforms. The stretching step
/// in `derive_master_key` is intentionally slow and CPU-bound; callers in
/// interactive hosts should run it off the main thread.
pub trait MasterKeyDeriver {
    /// Stretch a user name and master password into master key material
    /// under the given algorithm version.
    fn derive_master_key(
        &self,
        user_name: &str,
        master_password: &str,
        version: AlgorithmVersion,
    ) -> Result<MasterKey>;

    /// Derive the result string for one site request.
    ///
    /// `version` is the site's pinned algorithm version. Implementations
    /// must fail with [`DerivationError::VersionMismatch`] when the master
    /// key was produced under a different version, and
    /// [`DerivationError::UnsupportedVersion`] for revisions they cannot
    /// reproduce.
    ///
    /// `context` disambiguates multiple results under one purpose (e.g. the
    /// question text for [`KeyPurpose::Recovery`]); `None` and `Some("")`
    /// are distinct inputs.
    ///
    /// [`DerivationError::VersionMismatch`]: crate::crypto::DerivationError::VersionMismatch
    /// [`DerivationError::UnsupportedVersion`]: crate::crypto::DerivationError::UnsupportedVersion
    #[allow(clippy::too_many_arguments)]
    fn derive_site_result(
        &self,
        master_key: &MasterKey,
        site_name: &str,
        site_counter: SiteCounter,
        purpose: KeyPurpose,
        context: Option<&str>,
        result_type: ResultType,
        version: AlgorithmVersion,
    ) -> Result<String>;
}
