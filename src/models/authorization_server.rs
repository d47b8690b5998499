use serde::Deserialize;

use super::null_as_empty;

/// Authorization server of the legacy platform. Each organization owns one,
/// and its policies list the applications the organization can use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorizationServer {
    pub name: Option<String>,
    pub organization_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub policies: Vec<Policy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub applications: Vec<Option<String>>,
}

impl AuthorizationServer {
    /// Every application id referenced by any of the server's policies.
    /// Null entries are skipped.
    pub fn application_ids(&self) -> impl Iterator<Item = &str> {
        self.policies
            .iter()
            .flat_map(|policy| policy.applications.iter().flatten().map(String::as_str))
    }
}
