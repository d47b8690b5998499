//! Clipper tenant and organization listings.

use crate::{
    config::ExportSettings,
    csv_export::Row,
    document::Sources,
    mapping::load_clipper_organization_mapping,
};

pub const TENANT_COLUMNS: &[&str] = &[
    "Tenant ID",
    "Name",
    "Description",
    "Organization",
    "Product",
    "Product Version",
    "Hosting Group",
    "Type",
    "Production",
    "Golden Tenant",
    "Demo Tenant",
    "Note",
    "Provision Status",
    "Subscription End Date",
];

pub const ORGANIZATION_COLUMNS: &[&str] = &[
    "Organization ID",
    "Name",
    "Description",
    "External IDP ID",
    "Alias",
    "Type",
    "Active",
    "IsHexagon",
    "Provision Status",
];

pub(super) fn tenants(sources: &Sources, settings: &ExportSettings) -> Vec<Row> {
    let organizations = load_clipper_organization_mapping(&sources.clipper_organizations);

    sources
        .clipper_tenants
        .iter()
        .map(|tenant| {
            let region = tenant.region.as_deref().unwrap_or_default();
            let hosting_group = settings.hosting_group(region).unwrap_or_default();
            if hosting_group.is_empty() && !region.is_empty() {
                tracing::debug!(region, tenant = ?tenant.name, "No hosting group for region");
            }
            let organization = tenant
                .organization_id
                .as_deref()
                .and_then(|id| organizations.get(id))
                .unwrap_or_default();

            // Production, Golden and Demo flags are literal text in the
            // import template, not booleans.
            Row::new()
                .with("Tenant ID", tenant.id.as_deref().unwrap_or_default())
                .with("Name", tenant.name.as_deref().unwrap_or_default())
                .with("Description", tenant.description.as_deref().unwrap_or_default())
                .with("Organization", organization)
                .with("Product", &settings.product)
                .with("Product Version", &settings.product_version)
                .with("Hosting Group", hosting_group)
                .with("Type", "")
                .with("Production", "True")
                .with("Golden Tenant", "FALSE")
                .with("Demo Tenant", "FALSE")
                .with("Note", "")
                .with("Provision Status", "ACTIVE")
                .with("Subscription End Date", "")
        })
        .collect()
}

pub(super) fn organizations(sources: &Sources) -> Vec<Row> {
    sources
        .clipper_organizations
        .iter()
        .map(|organization| {
            let id = organization.id.as_deref().unwrap_or_default();
            let active = if organization.is_active.unwrap_or(false) {
                "Yes"
            } else {
                "No"
            };

            Row::new()
                .with("Organization ID", id)
                .with("Name", organization.name.as_deref().unwrap_or_default())
                .with(
                    "Description",
                    organization.description.as_deref().unwrap_or_default(),
                )
                .with("External IDP ID", id)
                .with("Alias", "")
                .with("Type", "Paying Customer")
                .with("Active", active)
                .with("IsHexagon", "No")
                .with("Provision Status", "ACTIVE")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::DocumentRole;

    fn fixture() -> Sources {
        let mut sources = Sources::default();
        sources
            .insert(
                DocumentRole::ClipperOrganizations,
                json!({"value": [
                    {"Id": "org-1", "Name": "Acme", "Description": "Anvils", "IsActive": true},
                    {"Id": "org-2", "Name": "Beta"}
                ]}),
            )
            .unwrap();
        sources
            .insert(
                DocumentRole::ClipperTenants,
                json!([
                    {"Id": "t1", "Name": "Acme Prod", "OrganizationId": "org-1",
                     "Region": "West Europe"},
                    {"Id": "t2", "Name": "Stray", "OrganizationId": "org-9", "Region": "Mars"}
                ]),
            )
            .unwrap();
        sources
    }

    #[test]
    fn test_tenants_resolve_organization_and_hosting_group() {
        let rows = tenants(&fixture(), &ExportSettings::default());

        assert_eq!(
            rows[0].record(TENANT_COLUMNS),
            vec![
                "t1",
                "Acme Prod",
                "",
                "Acme",
                "SDx MT Cloud",
                "1",
                "Azure-HXGN-Sandbox-WEU",
                "",
                "True",
                "FALSE",
                "FALSE",
                "",
                "ACTIVE",
                "",
            ]
        );
        assert_eq!(rows[1].text("Organization"), "");
        assert_eq!(rows[1].text("Hosting Group"), "");
    }

    #[test]
    fn test_organizations_listing() {
        let rows = organizations(&fixture());

        assert_eq!(
            rows[0].record(ORGANIZATION_COLUMNS),
            vec![
                "org-1",
                "Acme",
                "Anvils",
                "org-1",
                "",
                "Paying Customer",
                "Yes",
                "No",
                "ACTIVE",
            ]
        );
        assert_eq!(rows[1].text("Active"), "No");
    }
}
