//! The site entity and its derivation contract.

use crate::crypto::{MasterKey, MasterKeyDeriver};
use crate::types::{AlgorithmVersion, KeyPurpose, ResultType, SiteCounter};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;
use uuid::Uuid;

/// Distinguishes sites saved in a user's collection from ephemeral ones.
///
/// A persistent site is owned by exactly one user and carries that user's
/// handle (a relation, never ownership). An incognito site is free-standing:
/// it exists for the duration of one session and is never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SiteVariant {
    Persistent {
        /// Handle of the owning user; immutable after construction.
        owner: Uuid,
        /// Opaque legacy payload for backward-compatible export, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        export_content: Option<String>,
    },
    Incognito,
}

/// A named derivation identity.
///
/// The site's password is never stored; it is recomputed on demand from the
/// caller's master key and the tuple `(site_name, site_counter, purpose,
/// context, result_type, algorithm_version)`. Two sites are equal iff their
/// names are equal, independent of every other field; a user's collection
/// indexes sites by name and must reject duplicates at insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    site_name: String,
    site_counter: SiteCounter,
    result_type: ResultType,
    // Frozen once set: never silently migrated, so previously generated
    // passwords stay reproducible after the algorithm is upgraded.
    algorithm_version: AlgorithmVersion,
    last_used: DateTime<Utc>,
    uses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login_name: Option<String>,
    variant: SiteVariant,
}

impl Site {
    /// Create a persistent site with lifecycle defaults: counter 1, the
    /// default result type, the current algorithm version.
    pub fn persistent(owner: Uuid, site_name: impl Into<String>) -> Self {
        Self::persistent_with(owner, site_name, SiteCounter::default(), ResultType::DEFAULT)
    }

    /// Create a persistent site with an explicit counter and result type.
    pub fn persistent_with(
        owner: Uuid,
        site_name: impl Into<String>,
        site_counter: SiteCounter,
        result_type: ResultType,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            site_counter,
            result_type,
            algorithm_version: AlgorithmVersion::CURRENT,
            last_used: Utc::now(),
            uses: 0,
            login_name: None,
            variant: SiteVariant::Persistent {
                owner,
                export_content: None,
            },
        }
    }

    /// Reconstruct a persistent site from storage.
    ///
    /// The stored algorithm version is kept untouched; migration to a newer
    /// version only ever happens through [`Site::set_algorithm_version`].
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        owner: Uuid,
        algorithm_version: AlgorithmVersion,
        last_used: DateTime<Utc>,
        site_name: impl Into<String>,
        result_type: ResultType,
        site_counter: SiteCounter,
        uses: u32,
        login_name: Option<String>,
        export_content: Option<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            site_counter,
            result_type,
            algorithm_version,
            last_used,
            uses,
            login_name,
            variant: SiteVariant::Persistent {
                owner,
                export_content,
            },
        }
    }

    /// Create an incognito site for a one-off derivation.
    ///
    /// Every field is explicit: nothing about the site is remembered, so
    /// the caller must supply the exact tuple they want reproduced.
    pub fn incognito(
        site_name: impl Into<String>,
        site_counter: SiteCounter,
        result_type: ResultType,
        algorithm_version: AlgorithmVersion,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            site_counter,
            result_type,
            algorithm_version,
            last_used: Utc::now(),
            uses: 0,
            login_name: None,
            variant: SiteVariant::Incognito,
        }
    }

    /// Derive this site's result for the given purpose and context.
    ///
    /// Forwards `(site_name, site_counter, purpose, context, result_type,
    /// algorithm_version)` bound to the caller's master key. A successful
    /// call records the use; a failed one leaves `last_used` and `uses`
    /// untouched and surfaces the collaborator's error unchanged.
    pub fn derive_result<D: MasterKeyDeriver + ?Sized>(
        &mut self,
        deriver: &D,
        master_key: &MasterKey,
        purpose: KeyPurpose,
        context: Option<&str>,
    ) -> Result<String> {
        let result = deriver.derive_site_result(
            master_key,
            &self.site_name,
            self.site_counter,
            purpose,
            context,
            self.result_type,
            self.algorithm_version,
        )?;
        self.record_use();
        Ok(result)
    }

    /// Derive with purpose [`KeyPurpose::Authentication`] and no context.
    ///
    /// Context stays `None` rather than an empty string: the two are
    /// distinct derivation inputs at the collaborator boundary.
    pub fn derive_default<D: MasterKeyDeriver + ?Sized>(
        &mut self,
        deriver: &D,
        master_key: &MasterKey,
    ) -> Result<String> {
        self.derive_result(deriver, master_key, KeyPurpose::Authentication, None)
    }

    /// Record one successful use: bump the use count and move `last_used`
    /// forward. Infallible; never moves `last_used` backwards.
    ///
    /// For a persistent site the owning user's own last-used tracking is
    /// updated by the collection that holds the site (see
    /// [`User::derive_result`](crate::model::User::derive_result)); an
    /// incognito site notifies no one.
    pub fn record_use(&mut self) {
        self.uses = self.uses.saturating_add(1);
        self.last_used = self.last_used.max(Utc::now());
        match &self.variant {
            SiteVariant::Persistent { owner, .. } => {
                debug!(site = %self.site_name, %owner, uses = self.uses, "site used");
            }
            SiteVariant::Incognito => {
                debug!(site = %self.site_name, uses = self.uses, "incognito site used");
            }
        }
    }

    /// The site's identity: its name. Defines equality and hashing.
    pub fn identity(&self) -> &str {
        &self.site_name
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn set_site_name(&mut self, site_name: impl Into<String>) {
        self.site_name = site_name.into();
    }

    pub fn site_counter(&self) -> SiteCounter {
        self.site_counter
    }

    /// Rotate the site's secret by changing its counter.
    ///
    /// Counter 0 is rejected with
    /// [`PassforgeError::InvalidCounter`](crate::PassforgeError::InvalidCounter) and
    /// the site is left unchanged. No re-derivation is triggered; callers
    /// must derive again to see the rotated secret.
    pub fn set_site_counter(&mut self, site_counter: u32) -> Result<()> {
        self.site_counter = SiteCounter::new(site_counter)?;
        Ok(())
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn set_result_type(&mut self, result_type: ResultType) {
        self.result_type = result_type;
    }

    pub fn algorithm_version(&self) -> AlgorithmVersion {
        self.algorithm_version
    }

    /// Explicitly migrate the site to another algorithm version.
    ///
    /// This is a deliberate user action; the model never upgrades a site on
    /// its own, and does not re-derive anything here.
    pub fn set_algorithm_version(&mut self, algorithm_version: AlgorithmVersion) {
        if algorithm_version != self.algorithm_version {
            debug!(
                site = %self.site_name,
                from = %self.algorithm_version,
                to = %algorithm_version,
                "algorithm version changed"
            );
        }
        self.algorithm_version = algorithm_version;
    }

    pub fn last_used(&self) -> DateTime<Utc> {
        self.last_used
    }

    pub fn uses(&self) -> u32 {
        self.uses
    }

    pub fn login_name(&self) -> Option<&str> {
        self.login_name.as_deref()
    }

    /// Auxiliary display/autofill field; never part of the derivation.
    pub fn set_login_name(&mut self, login_name: Option<String>) {
        self.login_name = login_name;
    }

    pub fn variant(&self) -> &SiteVariant {
        &self.variant
    }

    /// Handle of the owning user, if this site is persistent.
    pub fn owner(&self) -> Option<Uuid> {
        match &self.variant {
            SiteVariant::Persistent { owner, .. } => Some(*owner),
            SiteVariant::Incognito => None,
        }
    }

    pub fn is_incognito(&self) -> bool {
        matches!(self.variant, SiteVariant::Incognito)
    }

    /// Opaque payload for backward-compatible export formats.
    ///
    /// Defaults to nothing; persistent sites restored from a legacy stored
    /// secret carry the stored encrypted content here. Incognito sites
    /// never export anything.
    pub fn export_content(&self) -> Option<&str> {
        match &self.variant {
            SiteVariant::Persistent { export_content, .. } => export_content.as_deref(),
            SiteVariant::Incognito => None,
        }
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.site_name == other.site_name
    }
}

impl Eq for Site {}

impl Hash for Site {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.site_name.hash(state);
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Site: {}}}", self.site_name)
    }
}
