//! Row expansion: one named strategy per export the migration produces.
//!
//! Every strategy starts from a primary collection in [`Sources`], resolves
//! foreign keys through the lookup tables in [`crate::mapping`], and emits
//! zero, one or many rows per primary record. Strategies differ in which
//! records are eligible and in the axis rows are expanded along, so each
//! keeps its own function rather than sharing a generic one.
//!
//! Row order always follows the order of the primary document.

mod applications;
mod directory;
mod groups;
mod users;

pub use applications::APPLICATION_COLUMNS;
pub use directory::{ORGANIZATION_COLUMNS, TENANT_COLUMNS};
pub use groups::GROUP_COLUMNS;
pub use users::{HCAP_USER_COLUMNS, UNNAMED_USER_COLUMNS, USER_COLUMNS, USER_ID_COLUMNS};

use std::fmt;

use crate::{
    config::{ExportSettings, OutputsConfig},
    csv_export::Export,
    document::{DocumentRole, Sources},
};

/// The exports the migration can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportStrategy {
    /// One row per application, deduplicated by name.
    Applications,
    /// One row per application and resolvable tenant.
    ApplicationsByTenant,
    /// One row per application whose organization resolves on the clipper side.
    ApplicationsByClipperOrganization,
    /// One row per eligible group and granted application.
    GroupsByApplication,
    /// One file per eligible group, one row per member user.
    GroupUserFiles,
    /// One row per user with a resolvable organization.
    Users,
    /// One row per user and group membership.
    UsersByGroup,
    /// Prefixed login and id of users in clipper organizations.
    UserIds,
    /// HCAP users matched against the backup users by login.
    HcapUsers,
    /// Users missing a first or last name.
    UnnamedUsers,
    /// One row per clipper tenant.
    Tenants,
    /// One row per clipper organization.
    Organizations,
}

impl ExportStrategy {
    pub const ALL: [ExportStrategy; 12] = [
        Self::Applications,
        Self::ApplicationsByTenant,
        Self::ApplicationsByClipperOrganization,
        Self::GroupsByApplication,
        Self::GroupUserFiles,
        Self::Users,
        Self::UsersByGroup,
        Self::UserIds,
        Self::HcapUsers,
        Self::UnnamedUsers,
        Self::Tenants,
        Self::Organizations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::ApplicationsByTenant => "applications-by-tenant",
            Self::ApplicationsByClipperOrganization => "applications-by-clipper-organization",
            Self::GroupsByApplication => "groups-by-application",
            Self::GroupUserFiles => "group-user-files",
            Self::Users => "users",
            Self::UsersByGroup => "users-by-group",
            Self::UserIds => "user-ids",
            Self::HcapUsers => "hcap-users",
            Self::UnnamedUsers => "unnamed-users",
            Self::Tenants => "tenants",
            Self::Organizations => "organizations",
        }
    }

    /// Documents that must be present for the strategy to run.
    pub fn required_documents(&self) -> &'static [DocumentRole] {
        use DocumentRole::*;

        match self {
            Self::Applications => &[Applications, AuthorizationServers],
            Self::ApplicationsByTenant => &[Applications, AuthorizationServers, ClipperTenants],
            Self::ApplicationsByClipperOrganization => &[
                Applications,
                AuthorizationServers,
                ClipperTenants,
                ClipperOrganizations,
            ],
            Self::GroupsByApplication | Self::GroupUserFiles => &[
                Groups,
                UserGroupAssignments,
                ApplicationGroupAssignments,
                Users,
                AuthorizationServers,
                ClipperOrganizations,
            ],
            Self::Users => &[Users, AuthorizationServers],
            Self::UsersByGroup => &[
                Users,
                UserGroupAssignments,
                Groups,
                AuthorizationServers,
                ClipperOrganizations,
            ],
            Self::UserIds => &[Users, ClipperOrganizations],
            Self::HcapUsers => &[HcapUsers, Users, AuthorizationServers, ClipperOrganizations],
            Self::UnnamedUsers => &[Users],
            Self::Tenants => &[ClipperTenants, ClipperOrganizations],
            Self::Organizations => &[ClipperOrganizations],
        }
    }

    /// Documents used when their file exists and ignored otherwise.
    pub fn optional_documents(&self) -> &'static [DocumentRole] {
        use DocumentRole::*;

        match self {
            Self::Users => &[ClipperOrganizations, ExcludedLogins],
            Self::UsersByGroup | Self::UserIds | Self::UnnamedUsers => &[ExcludedLogins],
            _ => &[],
        }
    }
}

impl fmt::Display for ExportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs export strategies against one set of decoded documents.
pub struct Exporter<'a> {
    sources: &'a Sources,
    settings: &'a ExportSettings,
    outputs: &'a OutputsConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(
        sources: &'a Sources,
        settings: &'a ExportSettings,
        outputs: &'a OutputsConfig,
    ) -> Self {
        Self {
            sources,
            settings,
            outputs,
        }
    }

    pub fn run(&self, strategy: ExportStrategy) -> Export {
        let sources = self.sources;
        let settings = self.settings;
        let file_name = self.outputs.file_name(strategy);

        let export = match strategy {
            ExportStrategy::Applications => {
                Export::single(APPLICATION_COLUMNS, file_name, applications::flat(sources))
            }
            ExportStrategy::ApplicationsByTenant => Export::single(
                APPLICATION_COLUMNS,
                file_name,
                applications::by_tenant(sources),
            ),
            ExportStrategy::ApplicationsByClipperOrganization => Export::single(
                APPLICATION_COLUMNS,
                file_name,
                applications::by_clipper_organization(sources),
            ),
            ExportStrategy::GroupsByApplication => Export::single(
                GROUP_COLUMNS,
                file_name,
                groups::by_application(sources),
            ),
            ExportStrategy::GroupUserFiles => Export::per_entity(
                GROUP_COLUMNS,
                groups::user_files(sources, &self.outputs.group_file_prefix),
            ),
            ExportStrategy::Users => Export::single(
                USER_COLUMNS,
                file_name,
                users::with_organization(sources, settings),
            ),
            ExportStrategy::UsersByGroup => Export::single(
                USER_COLUMNS,
                file_name,
                users::by_group(sources, settings),
            ),
            ExportStrategy::UserIds => Export::single(
                USER_ID_COLUMNS,
                file_name,
                users::ids(sources, settings),
            ),
            ExportStrategy::HcapUsers => Export::single(
                HCAP_USER_COLUMNS,
                file_name,
                users::hcap(sources, settings),
            ),
            ExportStrategy::UnnamedUsers => {
                Export::single(UNNAMED_USER_COLUMNS, file_name, users::unnamed(sources))
            }
            ExportStrategy::Tenants => Export::single(
                TENANT_COLUMNS,
                file_name,
                directory::tenants(sources, settings),
            ),
            ExportStrategy::Organizations => Export::single(
                ORGANIZATION_COLUMNS,
                file_name,
                directory::organizations(sources),
            ),
        };

        tracing::info!(
            strategy = %strategy,
            rows = export.row_count(),
            files = export.destinations().len(),
            "Export expanded"
        );

        export
    }
}
