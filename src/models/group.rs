use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    pub process_status: Option<String>,
    #[serde(rename = "IDPStatus")]
    pub idp_status: Option<String>,
}
