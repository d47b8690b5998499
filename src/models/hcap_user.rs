use serde::Deserialize;

use super::{User, null_as_empty};

/// User listed by the HCAP platform, identified only by its SPF login name.
///
/// After [`HcapUser::merge`] the record carries the matching backup user's
/// fields as well.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HcapUser {
    #[serde(rename = "SPFLoginName")]
    pub spf_login_name: Option<String>,
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub admin_roles: Option<String>,
    pub organization_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub group_ids: Vec<Option<String>>,
}

impl HcapUser {
    pub fn trimmed_spf_login(&self) -> &str {
        self.spf_login_name.as_deref().unwrap_or_default().trim()
    }

    /// Overlay the fields the backup user carries onto this record.
    pub fn merge(&mut self, user: &User) {
        fn overlay(target: &mut Option<String>, source: &Option<String>) {
            if source.is_some() {
                target.clone_from(source);
            }
        }

        overlay(&mut self.id, &user.id);
        overlay(&mut self.first_name, &user.first_name);
        overlay(&mut self.last_name, &user.last_name);
        overlay(&mut self.description, &user.description);
        overlay(&mut self.email, &user.email);
        overlay(&mut self.admin_roles, &user.admin_roles);
        overlay(&mut self.organization_id, &user.organization_id);
        if user.is_active.is_some() {
            self.is_active = user.is_active;
        }
        if !user.group_ids.is_empty() {
            self.group_ids.clone_from(&user.group_ids);
        }
    }
}
