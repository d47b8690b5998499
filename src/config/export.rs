use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Literal values the import templates expect in every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    /// Product written into user and tenant rows.
    #[serde(default = "default_product")]
    pub product: String,

    #[serde(default = "default_product_version")]
    pub product_version: String,

    /// Identity provider type of every migrated user.
    #[serde(default = "default_provider_type")]
    pub provider_type: String,

    /// Prepended to logins in the user id export.
    #[serde(default = "default_login_prefix")]
    pub login_prefix: String,

    /// Group name used when a membership points at an unknown group.
    #[serde(default = "default_unknown_group")]
    pub unknown_group: String,

    /// Tenant region → hosting group. Regions not listed get an empty
    /// hosting group.
    #[serde(default = "default_hosting_groups")]
    pub hosting_groups: BTreeMap<String, String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            product: default_product(),
            product_version: default_product_version(),
            provider_type: default_provider_type(),
            login_prefix: default_login_prefix(),
            unknown_group: default_unknown_group(),
            hosting_groups: default_hosting_groups(),
        }
    }
}

impl ExportSettings {
    pub fn hosting_group(&self, region: &str) -> Option<&str> {
        self.hosting_groups.get(region).map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosting_groups.keys().any(|region| region.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "export.hosting_groups: region names must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_product() -> String {
    "SDx MT Cloud".into()
}

fn default_product_version() -> String {
    "1".into()
}

fn default_provider_type() -> String {
    "Federation".into()
}

fn default_login_prefix() -> String {
    "USR_".into()
}

fn default_unknown_group() -> String {
    "Unknown Group".into()
}

fn default_hosting_groups() -> BTreeMap<String, String> {
    [
        ("Central US", "Azure-HXGN-Sandbox-CUS"),
        ("West Europe", "Azure-HXGN-Sandbox-WEU"),
        ("Southeast Asia", "Azure-HXGN-Sandbox-SA"),
        ("UAE North", "Azure-HXGN-Sandbox-UAE"),
    ]
    .into_iter()
    .map(|(region, group)| (region.to_string(), group.to_string()))
    .collect()
}
