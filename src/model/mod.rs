//! The identity model: sites, users, and the registry binding them.

pub mod site;
pub mod user;

pub use site::{Site, SiteVariant};
pub use user::{User, UserRegistry};
