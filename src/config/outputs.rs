use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::export::ExportStrategy;

/// Where exports are written and under which names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct OutputsConfig {
    /// Directory receiving every CSV file. Created when missing.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_applications")]
    pub applications: String,

    #[serde(default = "default_applications_by_tenant")]
    pub applications_by_tenant: String,

    #[serde(default = "default_applications_by_clipper_organization")]
    pub applications_by_clipper_organization: String,

    #[serde(default = "default_groups_by_application")]
    pub groups_by_application: String,

    /// Prefix of the per-group membership files. The sanitized group name
    /// and `.csv` are appended.
    #[serde(default = "default_group_file_prefix")]
    pub group_file_prefix: String,

    #[serde(default = "default_users")]
    pub users: String,

    #[serde(default = "default_users_by_group")]
    pub users_by_group: String,

    #[serde(default = "default_user_ids")]
    pub user_ids: String,

    #[serde(default = "default_hcap_users")]
    pub hcap_users: String,

    #[serde(default = "default_unnamed_users")]
    pub unnamed_users: String,

    #[serde(default = "default_tenants")]
    pub tenants: String,

    #[serde(default = "default_organizations")]
    pub organizations: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            applications: default_applications(),
            applications_by_tenant: default_applications_by_tenant(),
            applications_by_clipper_organization: default_applications_by_clipper_organization(),
            groups_by_application: default_groups_by_application(),
            group_file_prefix: default_group_file_prefix(),
            users: default_users(),
            users_by_group: default_users_by_group(),
            user_ids: default_user_ids(),
            hcap_users: default_hcap_users(),
            unnamed_users: default_unnamed_users(),
            tenants: default_tenants(),
            organizations: default_organizations(),
        }
    }
}

impl OutputsConfig {
    /// Output file name of a strategy. For the per-group strategy this is
    /// the file-name prefix.
    pub fn file_name(&self, strategy: ExportStrategy) -> &str {
        match strategy {
            ExportStrategy::Applications => &self.applications,
            ExportStrategy::ApplicationsByTenant => &self.applications_by_tenant,
            ExportStrategy::ApplicationsByClipperOrganization => {
                &self.applications_by_clipper_organization
            }
            ExportStrategy::GroupsByApplication => &self.groups_by_application,
            ExportStrategy::GroupUserFiles => &self.group_file_prefix,
            ExportStrategy::Users => &self.users,
            ExportStrategy::UsersByGroup => &self.users_by_group,
            ExportStrategy::UserIds => &self.user_ids,
            ExportStrategy::HcapUsers => &self.hcap_users,
            ExportStrategy::UnnamedUsers => &self.unnamed_users,
            ExportStrategy::Tenants => &self.tenants,
            ExportStrategy::Organizations => &self.organizations,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for strategy in ExportStrategy::ALL {
            if self.file_name(strategy).trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "outputs: file name for '{strategy}' must not be empty"
                )));
            }
        }
        Ok(())
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("out")
}

fn default_applications() -> String {
    "applications.csv".into()
}

fn default_applications_by_tenant() -> String {
    "applications_with_tenants.csv".into()
}

fn default_applications_by_clipper_organization() -> String {
    "applications_with_clipper_tenants.csv".into()
}

fn default_groups_by_application() -> String {
    "groups.csv".into()
}

fn default_group_file_prefix() -> String {
    "group-user-rel-".into()
}

fn default_users() -> String {
    "users.csv".into()
}

fn default_users_by_group() -> String {
    "users_with_groups.csv".into()
}

fn default_user_ids() -> String {
    "users_with_id.csv".into()
}

fn default_hcap_users() -> String {
    "hcap_users_with_no_ID.csv".into()
}

fn default_unnamed_users() -> String {
    "users_without_name.csv".into()
}

fn default_tenants() -> String {
    "tenants.csv".into()
}

fn default_organizations() -> String {
    "organizations.csv".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_names_are_distinct() {
        let outputs = OutputsConfig::default();
        let mut names: Vec<&str> = ExportStrategy::ALL
            .iter()
            .map(|s| outputs.file_name(*s))
            .collect();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), ExportStrategy::ALL.len());
        assert!(outputs.validate().is_ok());
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let outputs = OutputsConfig {
            tenants: "  ".into(),
            ..Default::default()
        };

        let err = outputs.validate().unwrap_err();
        assert!(err.to_string().contains("tenants"));
    }
}
