//! Users and the registry that hands out user handles.
//!
//! A user owns the collection that indexes persistent sites by name. Sites
//! refer back to their owner through the user's `Uuid` handle only, so there
//! are no back-pointers and no ownership cycles; the registry is where a
//! handle is resolved to the user it names.

use crate::crypto::{MasterKey, MasterKeyDeriver};
use crate::model::Site;
use crate::types::KeyPurpose;
use crate::{PassforgeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// A user and their collection of persistent sites, indexed by site name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    user_id: Uuid,
    user_name: String,
    last_used: DateTime<Utc>,
    sites: HashMap<String, Site>,
}

impl User {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            user_name: user_name.into(),
            last_used: Utc::now(),
            sites: HashMap::new(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn last_used(&self) -> DateTime<Utc> {
        self.last_used
    }

    /// Move the user's own last-used tracking forward. Called whenever one
    /// of the user's sites records a use.
    pub fn update_last_used(&mut self) {
        self.last_used = self.last_used.max(Utc::now());
    }

    /// Add a new persistent site with lifecycle defaults.
    ///
    /// Site names are the identity of a site, so a duplicate name is
    /// rejected with [`PassforgeError::IdentityConflict`] and the
    /// collection is left unchanged.
    pub fn add_site(&mut self, site_name: &str) -> Result<&mut Site> {
        if self.sites.contains_key(site_name) {
            return Err(PassforgeError::IdentityConflict {
                name: site_name.to_string(),
            });
        }
        info!(user = %self.user_name, site = site_name, "site added");
        let user_id = self.user_id;
        Ok(self
            .sites
            .entry(site_name.to_string())
            .or_insert_with(|| Site::persistent(user_id, site_name)))
    }

    /// Adopt a site reconstructed from storage.
    ///
    /// The site must be persistent and already owned by this user; a
    /// persistent site is never re-parented.
    pub fn insert_site(&mut self, site: Site) -> Result<()> {
        match site.owner() {
            None => {
                return Err(PassforgeError::InvalidInput(
                    "incognito sites cannot be stored in a user's collection".to_string(),
                ))
            }
            Some(owner) if owner != self.user_id => {
                return Err(PassforgeError::InvalidInput(format!(
                    "site '{}' belongs to user {}",
                    site.site_name(),
                    owner
                )))
            }
            Some(_) => {}
        }
        if self.sites.contains_key(site.site_name()) {
            return Err(PassforgeError::IdentityConflict {
                name: site.site_name().to_string(),
            });
        }
        self.sites.insert(site.site_name().to_string(), site);
        Ok(())
    }

    /// Remove a site from the collection, destroying it.
    pub fn remove_site(&mut self, site_name: &str) -> Result<Site> {
        let site = self
            .sites
            .remove(site_name)
            .ok_or_else(|| PassforgeError::SiteNotFound {
                name: site_name.to_string(),
            })?;
        info!(user = %self.user_name, site = site_name, "site removed");
        Ok(site)
    }

    pub fn site(&self, site_name: &str) -> Option<&Site> {
        self.sites.get(site_name)
    }

    pub fn site_mut(&mut self, site_name: &str) -> Option<&mut Site> {
        self.sites.get_mut(site_name)
    }

    pub fn site_names(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Derive a result through one of this user's sites.
    ///
    /// On success the site records its use and the user's own last-used
    /// tracking advances; on failure nothing is mutated.
    pub fn derive_result<D: MasterKeyDeriver + ?Sized>(
        &mut self,
        deriver: &D,
        master_key: &MasterKey,
        site_name: &str,
        purpose: KeyPurpose,
        context: Option<&str>,
    ) -> Result<String> {
        let site = self
            .sites
            .get_mut(site_name)
            .ok_or_else(|| PassforgeError::SiteNotFound {
                name: site_name.to_string(),
            })?;
        let result = site.derive_result(deriver, master_key, purpose, context)?;
        self.update_last_used();
        Ok(result)
    }

    /// Derive with purpose [`KeyPurpose::Authentication`] and no context.
    pub fn derive_default<D: MasterKeyDeriver + ?Sized>(
        &mut self,
        deriver: &D,
        master_key: &MasterKey,
        site_name: &str,
    ) -> Result<String> {
        self.derive_result(
            deriver,
            master_key,
            site_name,
            KeyPurpose::Authentication,
            None,
        )
    }

    /// Record an out-of-band use of one of this user's sites (e.g. a copy
    /// to the clipboard of an already-derived result).
    pub fn record_site_use(&mut self, site_name: &str) -> Result<()> {
        let site = self
            .sites
            .get_mut(site_name)
            .ok_or_else(|| PassforgeError::SiteNotFound {
                name: site_name.to_string(),
            })?;
        site.record_use();
        self.update_last_used();
        Ok(())
    }
}

/// Resolves user handles to users.
///
/// Hosts that let sites outlive the session hold their users here; a site's
/// `owner` handle is only meaningful against one registry.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserRegistry {
    users: HashMap<Uuid, User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, returning their handle.
    pub fn add_user(&mut self, user: User) -> Uuid {
        let id = user.user_id();
        debug!(user = %user.user_name(), %id, "user registered");
        self.users.insert(id, user);
        id
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    pub fn remove_user(&mut self, id: Uuid) -> Option<User> {
        self.users.remove(&id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Derive through a site owned by the user behind `id`.
    pub fn derive_result<D: MasterKeyDeriver + ?Sized>(
        &mut self,
        deriver: &D,
        master_key: &MasterKey,
        id: Uuid,
        site_name: &str,
        purpose: KeyPurpose,
        context: Option<&str>,
    ) -> Result<String> {
        let user = self
            .users
            .get_mut(&id)
            .ok_or(PassforgeError::UnknownUser { id })?;
        user.derive_result(deriver, master_key, site_name, purpose, context)
    }
}
