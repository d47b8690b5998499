use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::DocumentRole;

/// Location of every input document.
///
/// Relative paths resolve against `directory`; absolute paths are used as
/// given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    /// Directory holding the input documents.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_applications")]
    pub applications: PathBuf,

    #[serde(default = "default_users")]
    pub users: PathBuf,

    #[serde(default = "default_groups")]
    pub groups: PathBuf,

    #[serde(default = "default_authorization_servers")]
    pub authorization_servers: PathBuf,

    /// Organizations of the target platform, `{"value": [...]}` shaped.
    #[serde(default = "default_clipper_organizations")]
    pub clipper_organizations: PathBuf,

    /// Tenants of the target platform, `{"value": [...]}` shaped.
    #[serde(default = "default_clipper_tenants")]
    pub clipper_tenants: PathBuf,

    #[serde(default = "default_user_group_assignments")]
    pub user_group_assignments: PathBuf,

    #[serde(default = "default_application_group_assignments")]
    pub application_group_assignments: PathBuf,

    /// Flat list of logins that are never exported.
    #[serde(default = "default_excluded_logins")]
    pub excluded_logins: PathBuf,

    #[serde(default = "default_hcap_users")]
    pub hcap_users: PathBuf,

    /// Full platform backup, split by `split-backup`.
    #[serde(default = "default_backup")]
    pub backup: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            applications: default_applications(),
            users: default_users(),
            groups: default_groups(),
            authorization_servers: default_authorization_servers(),
            clipper_organizations: default_clipper_organizations(),
            clipper_tenants: default_clipper_tenants(),
            user_group_assignments: default_user_group_assignments(),
            application_group_assignments: default_application_group_assignments(),
            excluded_logins: default_excluded_logins(),
            hcap_users: default_hcap_users(),
            backup: default_backup(),
        }
    }
}

impl InputsConfig {
    /// Resolved path of the document for `role`.
    pub fn path(&self, role: DocumentRole) -> PathBuf {
        self.directory.join(self.configured(role))
    }

    fn configured(&self, role: DocumentRole) -> &Path {
        match role {
            DocumentRole::Applications => &self.applications,
            DocumentRole::Users => &self.users,
            DocumentRole::Groups => &self.groups,
            DocumentRole::AuthorizationServers => &self.authorization_servers,
            DocumentRole::ClipperOrganizations => &self.clipper_organizations,
            DocumentRole::ClipperTenants => &self.clipper_tenants,
            DocumentRole::UserGroupAssignments => &self.user_group_assignments,
            DocumentRole::ApplicationGroupAssignments => &self.application_group_assignments,
            DocumentRole::ExcludedLogins => &self.excluded_logins,
            DocumentRole::HcapUsers => &self.hcap_users,
            DocumentRole::Backup => &self.backup,
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_applications() -> PathBuf {
    PathBuf::from("applications.json")
}

fn default_users() -> PathBuf {
    PathBuf::from("users.json")
}

fn default_groups() -> PathBuf {
    PathBuf::from("groups.json")
}

fn default_authorization_servers() -> PathBuf {
    PathBuf::from("authorizationservers.json")
}

fn default_clipper_organizations() -> PathBuf {
    PathBuf::from("clipperOrgs.json")
}

fn default_clipper_tenants() -> PathBuf {
    PathBuf::from("clipperTenants.json")
}

fn default_user_group_assignments() -> PathBuf {
    PathBuf::from("usergroupassignments.json")
}

fn default_application_group_assignments() -> PathBuf {
    PathBuf::from("applicationgroupassignments.json")
}

fn default_excluded_logins() -> PathBuf {
    PathBuf::from("myUsers.json")
}

fn default_hcap_users() -> PathBuf {
    PathBuf::from("HCAPUsersWithouID.json")
}

fn default_backup() -> PathBuf {
    PathBuf::from("backup.json")
}
