use crate::{
    csv_export::{Destination, Row},
    document::Sources,
    mapping::{
        NameLookup, OrganizationResolver, Relation, load_applications_by_group,
        load_clipper_organization_mapping, load_organizations_by_id, load_user_logins,
        load_users_by_group,
    },
    models::Group,
    normalize::{is_well_formed_organization_id, join_nullable_with, sanitize_file_stem, trimmed},
};

pub const GROUP_COLUMNS: &[&str] = &[
    "Name",
    "Description",
    "Group ID",
    "Process Status",
    "IDP Status",
    "Organization",
    "Application",
    "User",
];

/// Indexes shared by both group strategies.
struct GroupIndex {
    organizations: OrganizationResolver,
    users_by_group: Relation,
    applications_by_group: Relation,
    logins: NameLookup,
}

impl GroupIndex {
    fn build(sources: &Sources) -> Self {
        Self {
            organizations: OrganizationResolver::new(
                load_organizations_by_id(&sources.authorization_servers),
                Some(load_clipper_organization_mapping(
                    &sources.clipper_organizations,
                )),
            ),
            users_by_group: load_users_by_group(&sources.user_group_assignments),
            applications_by_group: load_applications_by_group(
                &sources.application_group_assignments,
            ),
            logins: load_user_logins(&sources.users),
        }
    }

    /// Organization name of an exportable group.
    ///
    /// A group is exportable when its organization id is well formed and
    /// resolves to a name.
    fn organization(&self, group: &Group) -> Option<&str> {
        let organization_id = group.organization_id.as_deref().unwrap_or_default();
        if !is_well_formed_organization_id(organization_id) {
            tracing::debug!(
                group = ?group.name,
                organization_id,
                "Skipping group with a malformed organization id"
            );
            return None;
        }

        let organization = self.organizations.resolve(organization_id);
        if organization.is_none() {
            tracing::debug!(
                group = ?group.name,
                organization_id,
                "Skipping group whose organization does not resolve"
            );
        }
        organization
    }

    fn login(&self, user_id: &str) -> &str {
        self.logins.get(user_id).unwrap_or_default()
    }
}

fn group_row(group: &Group, organization: &str) -> Row {
    let process_status = group.process_status.as_deref().unwrap_or("DONE");
    let idp_status = group.idp_status.as_deref().unwrap_or("ACTIVE");

    Row::new()
        .with("Name", trimmed(group.name.as_deref()))
        .with("Description", trimmed(group.description.as_deref()))
        .with("Group ID", group.id.as_deref().unwrap_or_default())
        .with("Process Status", process_status.trim())
        .with("IDP Status", idp_status.trim())
        .with("Organization", organization)
}

/// One row per exportable group and granted application; every row carries
/// the group's full member login list.
pub(super) fn by_application(sources: &Sources) -> Vec<Row> {
    let index = GroupIndex::build(sources);

    let mut rows = Vec::new();
    for group in &sources.groups {
        let Some(organization) = index.organization(group) else {
            continue;
        };
        let group_id = group.id.as_deref().unwrap_or_default();

        let users = index
            .users_by_group
            .get(group_id)
            .iter()
            .map(|user_id| index.login(user_id))
            .filter(|login| !login.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        for application in index.applications_by_group.get(group_id) {
            rows.push(
                group_row(group, organization)
                    .with("Application", application.trim())
                    .with("User", users.trim()),
            );
        }
    }
    rows
}

/// One destination per exportable group, one row per member user.
///
/// Groups without members still get a file holding only the header.
pub(super) fn user_files(sources: &Sources, prefix: &str) -> Vec<Destination> {
    let index = GroupIndex::build(sources);

    let mut destinations = Vec::new();
    for group in &sources.groups {
        let Some(organization) = index.organization(group) else {
            continue;
        };
        let group_id = group.id.as_deref().unwrap_or_default();

        let applications: Vec<Option<String>> = index
            .applications_by_group
            .get(group_id)
            .iter()
            .cloned()
            .map(Some)
            .collect();
        let applications = join_nullable_with(&applications, ", ");

        let rows = index
            .users_by_group
            .get(group_id)
            .iter()
            .map(|user_id| {
                group_row(group, organization)
                    .with("Application", applications.trim())
                    .with("User", index.login(user_id).trim())
            })
            .collect();

        let stem = sanitize_file_stem(group.name.as_deref().unwrap_or("unknown"));
        destinations.push(Destination {
            file_name: format!("{prefix}{stem}.csv"),
            rows,
        });
    }
    destinations
}
