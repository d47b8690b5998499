use std::collections::HashMap;

use crate::{
    config::ExportSettings,
    csv_export::Row,
    document::Sources,
    mapping::{
        OrganizationResolver, load_clipper_organization_mapping, load_group_names,
        load_groups_by_user, load_organizations_by_id,
    },
    models::{HcapUser, User},
    normalize::{AdminRoles, derive_names, join_nullable, names_from_email, status_label, trimmed},
};

pub const USER_COLUMNS: &[&str] = &[
    "First Name",
    "Last Name",
    "Description",
    "Login name",
    "E-mail address",
    "Provider Type",
    "Application Admin",
    "Organization Admin",
    "System Admin",
    "Tenant Admin",
    "User Admin",
    "Organization",
    "Group",
    "Product",
    "Status",
];

pub const HCAP_USER_COLUMNS: &[&str] = &[
    "First Name",
    "Last Name",
    "Description",
    "Login name",
    "E-mail address",
    "Provider Type",
    "Application Admin",
    "Organization Admin",
    "System Admin",
    "Tenant Admin",
    "User Admin",
    "Organization",
    "Group",
    "Product",
    "Status",
    "ID",
];

pub const USER_ID_COLUMNS: &[&str] = &["Login name", "Id"];

pub const UNNAMED_USER_COLUMNS: &[&str] = &[
    "Login name",
    "First Name",
    "Last Name",
    "E-mail address",
    "OrganizationId",
];

/// Normalized identity fields shared by every full user row.
struct Person {
    first_name: String,
    last_name: String,
    description: String,
    login: String,
    email: String,
    roles: AdminRoles,
    active: bool,
}

impl Person {
    fn from_user(user: &User) -> Self {
        let email = trimmed(user.email.as_deref());
        let (first_name, last_name) =
            derive_names(user.first_name.as_deref(), user.last_name.as_deref(), &email);

        Self {
            first_name,
            last_name,
            description: trimmed(user.description.as_deref()),
            login: user.trimmed_login().to_string(),
            email,
            roles: AdminRoles::parse(user.admin_roles.as_deref().unwrap_or_default()),
            active: user.is_active(),
        }
    }

    /// HCAP records are keyed by SPF login, which also stands in for the
    /// e-mail and seeds the names when the record has none.
    fn from_hcap(user: &HcapUser) -> Self {
        let login = user.trimmed_spf_login();
        let (derived_first, derived_last) = names_from_email(login);
        let or_derived = |value: String, derived: String| {
            if value.is_empty() { derived } else { value }
        };
        let email = trimmed(user.email.as_deref());

        Self {
            first_name: or_derived(trimmed(user.first_name.as_deref()), derived_first),
            last_name: or_derived(trimmed(user.last_name.as_deref()), derived_last),
            description: trimmed(user.description.as_deref()),
            login: login.to_string(),
            email: or_derived(email, login.to_string()),
            roles: AdminRoles::parse(user.admin_roles.as_deref().unwrap_or_default()),
            active: user.is_active.unwrap_or(false),
        }
    }

    fn row(&self, settings: &ExportSettings, organization: &str, group: &str) -> Row {
        Row::new()
            .with("First Name", &self.first_name)
            .with("Last Name", &self.last_name)
            .with("Description", &self.description)
            .with("Login name", &self.login)
            .with("E-mail address", &self.email)
            .with("Provider Type", &settings.provider_type)
            .with("Application Admin", self.roles.application)
            .with("Organization Admin", self.roles.organization)
            .with("System Admin", self.roles.system)
            .with("Tenant Admin", self.roles.tenant)
            .with("User Admin", self.roles.user)
            .with("Organization", organization)
            .with("Group", group)
            .with("Product", &settings.product)
            .with("Status", status_label(self.active))
    }
}

fn organization_resolver(sources: &Sources) -> OrganizationResolver {
    OrganizationResolver::new(
        load_organizations_by_id(&sources.authorization_servers),
        Some(load_clipper_organization_mapping(
            &sources.clipper_organizations,
        )),
    )
}

fn is_excluded(sources: &Sources, user: &User) -> bool {
    let excluded = sources.excluded_logins.contains(user.trimmed_login());
    if excluded {
        tracing::debug!(login = user.trimmed_login(), "Skipping excluded login");
    }
    excluded
}

/// One row per user whose organization resolves to a name.
pub(super) fn with_organization(sources: &Sources, settings: &ExportSettings) -> Vec<Row> {
    let organizations = organization_resolver(sources);

    let mut rows = Vec::new();
    for user in &sources.users {
        if is_excluded(sources, user) {
            continue;
        }
        let organization_id = user.organization_id.as_deref().unwrap_or_default();
        let Some(organization) = organizations.resolve(organization_id) else {
            tracing::debug!(
                login = user.trimmed_login(),
                organization_id,
                "Skipping user whose organization does not resolve"
            );
            continue;
        };

        let person = Person::from_user(user);
        rows.push(person.row(settings, organization, &join_nullable(&user.group_ids)));
    }
    rows
}

/// One row per user and group membership, for users with a resolvable
/// organization and at least one group.
pub(super) fn by_group(sources: &Sources, settings: &ExportSettings) -> Vec<Row> {
    let organizations = organization_resolver(sources);
    let groups_by_user = load_groups_by_user(&sources.user_group_assignments);
    let group_names = load_group_names(&sources.groups);

    let mut rows = Vec::new();
    for user in &sources.users {
        if is_excluded(sources, user) {
            continue;
        }
        let organization_id = user.organization_id.as_deref().unwrap_or_default();
        let Some(organization) = organizations.resolve(organization_id) else {
            tracing::debug!(
                login = user.trimmed_login(),
                organization_id,
                "Skipping user whose organization does not resolve"
            );
            continue;
        };
        let group_ids = groups_by_user.get(user.id.as_deref().unwrap_or_default());
        if group_ids.is_empty() {
            tracing::debug!(login = user.trimmed_login(), "Skipping user without groups");
            continue;
        }

        let person = Person::from_user(user);
        for group_id in group_ids {
            let group = group_names
                .get(group_id)
                .unwrap_or(settings.unknown_group.as_str());
            rows.push(person.row(settings, organization, group));
        }
    }
    rows
}

/// Prefixed login and id of users whose organization exists on the clipper
/// side. The legacy organization view is deliberately not consulted.
pub(super) fn ids(sources: &Sources, settings: &ExportSettings) -> Vec<Row> {
    let clipper_organizations = load_clipper_organization_mapping(&sources.clipper_organizations);

    let mut rows = Vec::new();
    for user in &sources.users {
        if is_excluded(sources, user) {
            continue;
        }
        let organization_id = user.organization_id.as_deref().unwrap_or_default();
        if !clipper_organizations.contains(organization_id) {
            tracing::debug!(
                login = user.trimmed_login(),
                organization_id,
                "Skipping user outside the clipper organizations"
            );
            continue;
        }

        rows.push(
            Row::new()
                .with(
                    "Login name",
                    format!("{}{}", settings.login_prefix, user.trimmed_login()),
                )
                .with("Id", user.id.as_deref().unwrap_or_default()),
        );
    }
    rows
}

/// One row per HCAP user, merged with the backup user sharing its login.
pub(super) fn hcap(sources: &Sources, settings: &ExportSettings) -> Vec<Row> {
    let organizations = organization_resolver(sources);
    let users_by_login: HashMap<&str, &User> = sources
        .users
        .iter()
        .filter(|user| user.login.is_some())
        .map(|user| (user.trimmed_login(), user))
        .collect();

    let mut rows = Vec::new();
    for record in &sources.hcap_users {
        let mut merged = record.clone();
        match users_by_login.get(record.trimmed_spf_login()) {
            Some(user) => merged.merge(user),
            None => tracing::debug!(
                login = record.trimmed_spf_login(),
                "HCAP user has no matching backup user"
            ),
        }

        let organization = organizations
            .resolve(merged.organization_id.as_deref().unwrap_or_default())
            .unwrap_or_default();
        let person = Person::from_hcap(&merged);
        rows.push(
            person
                .row(settings, organization, &join_nullable(&merged.group_ids))
                .with("ID", merged.id.as_deref().unwrap_or_default()),
        );
    }
    rows
}

/// Users missing a first or last name, with their names as recorded.
pub(super) fn unnamed(sources: &Sources) -> Vec<Row> {
    let mut rows = Vec::new();
    for user in &sources.users {
        if is_excluded(sources, user) {
            continue;
        }
        let first_name = trimmed(user.first_name.as_deref());
        let last_name = trimmed(user.last_name.as_deref());
        if !first_name.is_empty() && !last_name.is_empty() {
            continue;
        }

        rows.push(
            Row::new()
                .with("Login name", user.trimmed_login())
                .with("First Name", first_name)
                .with("Last Name", last_name)
                .with("E-mail address", trimmed(user.email.as_deref()))
                .with(
                    "OrganizationId",
                    user.organization_id.as_deref().unwrap_or_default(),
                ),
        );
    }
    rows
}
