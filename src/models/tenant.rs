use serde::Deserialize;

/// Tenant record of the target ("clipper") platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tenant {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    /// Hosting region, e.g. `"West Europe"`.
    pub region: Option<String>,
}
