use serde::Deserialize;

/// Membership of a user in a group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserGroupAssignment {
    pub user_id: Option<String>,
    pub group_id: Option<String>,
}

/// Grant of an application (by name) to a group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationGroupAssignment {
    pub group_id: Option<String>,
    pub application_name: Option<String>,
}
