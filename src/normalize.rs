//! Pure field transforms shared by every export strategy.
//!
//! Role and flow detection is substring containment on the raw delimited
//! string, not an exact comparison of split tokens. A token embedded in a
//! longer one therefore counts as present.

use crate::models::ApplicationType;

/// Sentinel in a user's admin-role string that grants every role.
pub const ALL_ROLES: &str = "All";

/// Whether `token` occurs anywhere in `raw`.
pub fn contains_token(raw: &str, token: &str) -> bool {
    raw.contains(token)
}

/// Administrative roles recognised by the target platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminRoles {
    pub application: bool,
    pub organization: bool,
    pub system: bool,
    pub tenant: bool,
    pub user: bool,
}

impl AdminRoles {
    pub const ALL: Self = Self {
        application: true,
        organization: true,
        system: true,
        tenant: true,
        user: true,
    };

    pub fn parse(raw: &str) -> Self {
        if contains_token(raw, ALL_ROLES) {
            return Self::ALL;
        }
        Self {
            application: contains_token(raw, "ApplicationAdministrator"),
            organization: contains_token(raw, "OrganizationAdministrator"),
            system: contains_token(raw, "SystemAdministrator"),
            tenant: contains_token(raw, "TenantAdministrator"),
            user: contains_token(raw, "UserAdministrator"),
        }
    }
}

/// OAuth flows an application may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthenticationFlows {
    pub authorization_code: bool,
    pub client_credentials: bool,
    pub implicit: bool,
    pub refresh_token: bool,
    pub resource_owner: bool,
}

impl AuthenticationFlows {
    pub fn parse(raw: &str) -> Self {
        Self {
            authorization_code: contains_token(raw, "AuthorizationCode"),
            client_credentials: contains_token(raw, "ClientCredentials"),
            implicit: contains_token(raw, "Implicit"),
            refresh_token: contains_token(raw, "RefreshToken"),
            resource_owner: contains_token(raw, "ResourceOwner"),
        }
    }

    /// Flows as parsed, adjusted for the application's classification.
    /// Browser applications always use refresh tokens.
    pub fn for_application(raw: &str, classification: Option<ApplicationType>) -> Self {
        let mut flows = Self::parse(raw);
        if classification == Some(ApplicationType::Browser) {
            flows.refresh_token = true;
        }
        flows
    }
}

/// Join a list whose elements may be null, nulls becoming empty strings.
pub fn join_nullable(items: &[Option<String>]) -> String {
    join_nullable_with(items, ",")
}

pub fn join_nullable_with(items: &[Option<String>], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Derive `(first, last)` names from the local part of an e-mail address.
///
/// `jane.doe@x.com` gives `("Jane", "DOE")`; without a dot both names come
/// from the whole local part, `jane@x.com` giving `("Jane", "JANE")`.
pub fn names_from_email(email: &str) -> (String, String) {
    let local = email.split('@').next().unwrap_or_default();
    match local.split_once('.') {
        Some((first, last)) => (capitalize(first), last.to_uppercase()),
        None => (capitalize(local), local.to_uppercase()),
    }
}

/// Trimmed first and last names, each blank one filled in from the e-mail.
pub fn derive_names(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: &str,
) -> (String, String) {
    let first = first_name.unwrap_or_default().trim();
    let last = last_name.unwrap_or_default().trim();
    if !first.is_empty() && !last.is_empty() {
        return (first.to_string(), last.to_string());
    }

    let (derived_first, derived_last) = names_from_email(email);
    (
        if first.is_empty() { derived_first } else { first.to_string() },
        if last.is_empty() { derived_last } else { last.to_string() },
    )
}

/// Length of a well-formed organization identifier (a hyphenated GUID).
pub const ORGANIZATION_ID_LEN: usize = 36;

/// Only the identifier length is checked, as the source platform did.
pub fn is_well_formed_organization_id(id: &str) -> bool {
    id.chars().count() == ORGANIZATION_ID_LEN
}

pub fn status_label(active: bool) -> &'static str {
    if active { "ACTIVE" } else { "INACTIVE" }
}

/// File-name stem for an entity name. Spaces and path separators become
/// underscores, so the stem never leaves the output directory.
pub fn sanitize_file_stem(name: &str) -> String {
    name.replace([' ', '/', '\\'], "_")
}

/// Trimmed value of an optional text field.
pub fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}
