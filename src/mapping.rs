//! Lookup tables built once per run from the auxiliary documents.
//!
//! Two organization views coexist and are deliberately kept apart: the
//! legacy platform links organizations to applications through
//! authorization-server policies, while users and groups carry an
//! organization id directly. Which one a row uses decides which identifier
//! space it resolves in.

use std::collections::HashMap;

use crate::models::{
    ApplicationGroupAssignment, AuthorizationServer, Group, Organization, Tenant, User,
    UserGroupAssignment,
};

/// Read-only id → display-name dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLookup(HashMap<String, String>);

impl NameLookup {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Later pairs overwrite earlier ones with the same key.
impl FromIterator<(String, String)> for NameLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Application id → name of the authorization server whose policies list it.
pub fn load_organizations_by_application(servers: &[AuthorizationServer]) -> NameLookup {
    servers
        .iter()
        .filter_map(|server| Some((server, server.name.as_deref()?)))
        .flat_map(|(server, name)| {
            server
                .application_ids()
                .map(move |app_id| (app_id.to_string(), name.to_string()))
        })
        .collect()
}

/// Organization id → authorization server name.
pub fn load_organizations_by_id(servers: &[AuthorizationServer]) -> NameLookup {
    servers
        .iter()
        .filter_map(|server| {
            Some((
                non_empty(&server.organization_id)?.to_string(),
                non_empty(&server.name)?.to_string(),
            ))
        })
        .collect()
}

/// Application id → organization id of the authorization server listing it.
pub fn load_organization_ids_by_application(servers: &[AuthorizationServer]) -> NameLookup {
    servers
        .iter()
        .filter_map(|server| Some((server, server.organization_id.as_deref()?)))
        .flat_map(|(server, org_id)| {
            server
                .application_ids()
                .map(move |app_id| (app_id.to_string(), org_id.to_string()))
        })
        .collect()
}

/// Clipper organization id → name. Entries missing either are skipped.
pub fn load_clipper_organization_mapping(organizations: &[Organization]) -> NameLookup {
    organizations
        .iter()
        .filter_map(|org| Some((non_empty(&org.id)?.to_string(), non_empty(&org.name)?.to_string())))
        .collect()
}

/// Clipper tenant id → name. Entries missing either are skipped.
pub fn load_tenant_mapping(tenants: &[Tenant]) -> NameLookup {
    tenants
        .iter()
        .filter_map(|t| Some((non_empty(&t.id)?.to_string(), non_empty(&t.name)?.to_string())))
        .collect()
}

/// User id → login.
pub fn load_user_logins(users: &[User]) -> NameLookup {
    users
        .iter()
        .filter_map(|u| Some((non_empty(&u.id)?.to_string(), non_empty(&u.login)?.to_string())))
        .collect()
}

/// Group id → group name.
pub fn load_group_names(groups: &[Group]) -> NameLookup {
    groups
        .iter()
        .filter_map(|g| Some((non_empty(&g.id)?.to_string(), non_empty(&g.name)?.to_string())))
        .collect()
}

/// One-to-many relation index preserving document order within each key.
#[derive(Debug, Clone, Default)]
pub struct Relation(HashMap<String, Vec<String>>);

impl Relation {
    /// Related values of `key`, empty when there are none.
    pub fn get(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    fn push(&mut self, key: &str, value: &str) {
        self.0
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
}

/// Group id → ids of its member users.
pub fn load_users_by_group(assignments: &[UserGroupAssignment]) -> Relation {
    let mut relation = Relation::default();
    for assignment in assignments {
        if let (Some(user_id), Some(group_id)) = (
            non_empty(&assignment.user_id),
            assignment.group_id.as_deref(),
        ) {
            relation.push(group_id, user_id);
        }
    }
    relation
}

/// User id → ids of the groups it belongs to.
pub fn load_groups_by_user(assignments: &[UserGroupAssignment]) -> Relation {
    let mut relation = Relation::default();
    for assignment in assignments {
        if let (Some(user_id), Some(group_id)) =
            (non_empty(&assignment.user_id), non_empty(&assignment.group_id))
        {
            relation.push(user_id, group_id);
        }
    }
    relation
}

/// Group id → names of the applications granted to it.
pub fn load_applications_by_group(assignments: &[ApplicationGroupAssignment]) -> Relation {
    let mut relation = Relation::default();
    for assignment in assignments {
        if let (Some(name), Some(group_id)) = (
            non_empty(&assignment.application_name),
            assignment.group_id.as_deref(),
        ) {
            relation.push(group_id, name);
        }
    }
    relation
}

/// Resolves an organization id to a name, preferring the authorization
/// server view and falling back to the clipper organizations.
#[derive(Debug, Clone, Default)]
pub struct OrganizationResolver {
    primary: NameLookup,
    fallback: Option<NameLookup>,
}

impl OrganizationResolver {
    pub fn new(primary: NameLookup, fallback: Option<NameLookup>) -> Self {
        Self { primary, fallback }
    }

    pub fn resolve(&self, organization_id: &str) -> Option<&str> {
        self.primary
            .get(organization_id)
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.fallback
                    .as_ref()
                    .and_then(|fallback| fallback.get(organization_id))
                    .filter(|name| !name.is_empty())
            })
    }
}
