use std::collections::HashSet;

use crate::{
    csv_export::Row,
    document::Sources,
    mapping::{
        load_clipper_organization_mapping, load_organization_ids_by_application,
        load_organizations_by_application, load_tenant_mapping,
    },
    models::Application,
    normalize::{AdminRoles, AuthenticationFlows, join_nullable},
};

pub const APPLICATION_COLUMNS: &[&str] = &[
    "Name",
    "Description",
    "Authorization Code",
    "Client Credentials",
    "Implicit",
    "Refresh Token",
    "Resource Owner",
    "Application ID",
    "Application Admin",
    "Organization Admin",
    "System Admin",
    "Tenant Admin",
    "User Admin",
    "Identity",
    "Process Status",
    "IDP Status",
    "Type",
    "Client ID",
    "Login URI",
    "Redirect URI",
    "Post Logout Redirect URI",
    "Organization",
    "Group",
    "Tenant",
    "Classification",
];

/// One row per application, the first application with a given name winning.
pub(super) fn flat(sources: &Sources) -> Vec<Row> {
    let organizations = load_organizations_by_application(&sources.authorization_servers);
    let mut seen: HashSet<&str> = HashSet::new();

    let mut rows = Vec::new();
    for app in &sources.applications {
        let name = app.name.as_deref().unwrap_or_default();
        if name.is_empty() {
            tracing::debug!(id = ?app.id, "Skipping application without a name");
            continue;
        }
        if !seen.insert(name) {
            tracing::debug!(name, "Skipping duplicate application name");
            continue;
        }

        let organization = app
            .id
            .as_deref()
            .and_then(|id| organizations.get(id))
            .unwrap_or_default();
        rows.push(application_row(app, organization, join_nullable(&app.tenant_ids)));
    }
    rows
}

/// One row per application and tenant id that resolves to a tenant name.
pub(super) fn by_tenant(sources: &Sources) -> Vec<Row> {
    let organizations = load_organizations_by_application(&sources.authorization_servers);
    let tenants = load_tenant_mapping(&sources.clipper_tenants);

    let mut rows = Vec::new();
    for app in &sources.applications {
        let organization = app
            .id
            .as_deref()
            .and_then(|id| organizations.get(id))
            .unwrap_or_default();

        for tenant_id in app.tenant_ids.iter().flatten() {
            match tenants.get(tenant_id) {
                Some(tenant) => rows.push(application_row(app, organization, tenant.to_string())),
                None => tracing::debug!(tenant_id, app = ?app.name, "Tenant id does not resolve"),
            }
        }
    }
    rows
}

/// One row per application whose owning organization exists on the clipper
/// side. The Tenant column lists the resolvable tenant names.
pub(super) fn by_clipper_organization(sources: &Sources) -> Vec<Row> {
    let organization_ids = load_organization_ids_by_application(&sources.authorization_servers);
    let clipper_organizations = load_clipper_organization_mapping(&sources.clipper_organizations);
    let tenants = load_tenant_mapping(&sources.clipper_tenants);

    let mut rows = Vec::new();
    for app in &sources.applications {
        let organization_id = app
            .id
            .as_deref()
            .and_then(|id| organization_ids.get(id))
            .unwrap_or_default();
        let Some(organization) = clipper_organizations.get(organization_id) else {
            tracing::debug!(
                app = ?app.name,
                organization_id,
                "Skipping application outside the clipper organizations"
            );
            continue;
        };

        let tenant_names = app
            .tenant_ids
            .iter()
            .flatten()
            .filter_map(|id| tenants.get(id))
            .collect::<Vec<_>>()
            .join(",");
        rows.push(application_row(app, organization, tenant_names));
    }
    rows
}

fn application_row(app: &Application, organization: &str, tenant: String) -> Row {
    let classification = app.classification();
    let flows = AuthenticationFlows::for_application(
        app.authentication_flows.as_deref().unwrap_or_default(),
        classification,
    );
    let roles = AdminRoles::parse(app.admin_roles.as_deref().unwrap_or_default());
    let classification = classification.map(|c| c.as_str()).unwrap_or_default();

    Row::new()
        .with("Name", app.name.as_deref().unwrap_or_default())
        .with("Description", app.description.as_deref().unwrap_or_default())
        .with("Authorization Code", flows.authorization_code)
        .with("Client Credentials", flows.client_credentials)
        .with("Implicit", flows.implicit)
        .with("Refresh Token", flows.refresh_token)
        .with("Resource Owner", flows.resource_owner)
        .with("Application ID", app.id.as_deref().unwrap_or_default())
        .with("Application Admin", roles.application)
        .with("Organization Admin", roles.organization)
        .with("System Admin", roles.system)
        .with("Tenant Admin", roles.tenant)
        .with("User Admin", roles.user)
        .with("Identity", app.identity.as_deref().unwrap_or_default())
        .with("Process Status", app.process_status.as_deref().unwrap_or("DONE"))
        .with("IDP Status", app.idp_status.as_deref().unwrap_or("ACTIVE"))
        .with("Type", classification)
        .with("Client ID", app.effective_client_id())
        .with("Login URI", app.login_uri.as_deref().unwrap_or_default())
        .with("Redirect URI", join_nullable(&app.redirect_uris))
        .with(
            "Post Logout Redirect URI",
            join_nullable(&app.post_logout_redirect_uris),
        )
        .with("Organization", organization)
        .with("Group", join_nullable(&app.group_ids))
        .with("Tenant", tenant)
        .with("Classification", classification)
}
