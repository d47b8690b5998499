use serde::Deserialize;

use super::null_as_empty;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
    pub login: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    /// Comma-delimited role identifiers; `All` grants every role.
    pub admin_roles: Option<String>,
    pub organization_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub group_ids: Vec<Option<String>>,
}

impl User {
    /// Login with surrounding whitespace removed.
    pub fn trimmed_login(&self) -> &str {
        self.login.as_deref().unwrap_or_default().trim()
    }

    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }
}
