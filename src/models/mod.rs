//! Record types decoded from the identity-platform backup documents.
//!
//! Every field is optional: the backups come from several generations of the
//! source platform and none of them guarantee a complete record. Lists that
//! are absent or `null` decode as empty.

mod application;
mod assignment;
mod authorization_server;
mod group;
mod hcap_user;
mod organization;
mod tenant;
mod user;

pub use application::*;
pub use assignment::*;
pub use authorization_server::*;
pub use group::*;
pub use hcap_user::*;
pub use organization::*;
pub use tenant::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Decode a list field, treating `null` the same as a missing field.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
