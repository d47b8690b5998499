//! Decoding of the JSON documents a migration run reads.
//!
//! Backups come in two generations: a top-level array of records, or an
//! object wrapping the records in a `value` array. A bare object is taken as
//! a single record. Anything else is a malformed document and aborts the run.

use std::{collections::HashSet, fmt, path::Path};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{MigrationError, MigrationResult},
    models::{
        Application, ApplicationGroupAssignment, AuthorizationServer, Group, HcapUser,
        Organization, Tenant, User, UserGroupAssignment,
    },
};

/// The part a document plays in a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRole {
    Applications,
    Users,
    Groups,
    AuthorizationServers,
    ClipperOrganizations,
    ClipperTenants,
    UserGroupAssignments,
    ApplicationGroupAssignments,
    ExcludedLogins,
    HcapUsers,
    Backup,
}

impl DocumentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::Users => "users",
            Self::Groups => "groups",
            Self::AuthorizationServers => "authorization_servers",
            Self::ClipperOrganizations => "clipper_organizations",
            Self::ClipperTenants => "clipper_tenants",
            Self::UserGroupAssignments => "user_group_assignments",
            Self::ApplicationGroupAssignments => "application_group_assignments",
            Self::ExcludedLogins => "excluded_logins",
            Self::HcapUsers => "hcap_users",
            Self::Backup => "backup",
        }
    }
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read and parse a JSON document from disk.
pub fn read_document(role: DocumentRole, path: &Path) -> MigrationResult<Value> {
    let contents = std::fs::read_to_string(path).map_err(|source| MigrationError::Read {
        role,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| MigrationError::Parse {
        role,
        path: path.to_path_buf(),
        source,
    })
}

/// Unwrap the record list of a document, whichever generation it is.
fn record_values(role: DocumentRole, document: Value) -> MigrationResult<Vec<Value>> {
    match document {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(MigrationError::Malformed {
                role,
                detail: format!("`value` must be an array, found {}", json_kind(&other)),
            }),
            None => Ok(vec![Value::Object(map)]),
        },
        other => Err(MigrationError::Malformed {
            role,
            detail: format!("expected an array or object, found {}", json_kind(&other)),
        }),
    }
}

/// Decode the records of a document.
///
/// Elements that are not JSON objects are skipped. An object whose fields
/// have the wrong types fails the whole document.
pub fn load_records<T: DeserializeOwned>(
    role: DocumentRole,
    document: Value,
) -> MigrationResult<Vec<T>> {
    let values = record_values(role, document)?;
    let mut records = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            tracing::warn!(
                role = %role,
                index,
                kind = json_kind(&value),
                "Skipping non-object record"
            );
            continue;
        }
        let record = serde_json::from_value(value)
            .map_err(|source| MigrationError::Record { role, index, source })?;
        records.push(record);
    }

    Ok(records)
}

/// Decode the flat list of logins that must never be exported.
pub fn load_excluded_logins(document: Value) -> MigrationResult<HashSet<String>> {
    let role = DocumentRole::ExcludedLogins;
    record_values(role, document)?
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(login) => Ok(login),
            other => Err(MigrationError::Malformed {
                role,
                detail: format!(
                    "element {index} must be a login string, found {}",
                    json_kind(&other)
                ),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Every document a run may draw on, fully decoded in memory.
///
/// Documents a strategy does not need stay empty.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub applications: Vec<Application>,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub authorization_servers: Vec<AuthorizationServer>,
    pub clipper_organizations: Vec<Organization>,
    pub clipper_tenants: Vec<Tenant>,
    pub user_group_assignments: Vec<UserGroupAssignment>,
    pub application_group_assignments: Vec<ApplicationGroupAssignment>,
    pub excluded_logins: HashSet<String>,
    pub hcap_users: Vec<HcapUser>,
}

impl Sources {
    /// Decode `document` into the slot belonging to `role`.
    pub fn insert(&mut self, role: DocumentRole, document: Value) -> MigrationResult<()> {
        match role {
            DocumentRole::Applications => self.applications = load_records(role, document)?,
            DocumentRole::Users => self.users = load_records(role, document)?,
            DocumentRole::Groups => self.groups = load_records(role, document)?,
            DocumentRole::AuthorizationServers => {
                self.authorization_servers = load_records(role, document)?
            }
            DocumentRole::ClipperOrganizations => {
                self.clipper_organizations = load_records(role, document)?
            }
            DocumentRole::ClipperTenants => self.clipper_tenants = load_records(role, document)?,
            DocumentRole::UserGroupAssignments => {
                self.user_group_assignments = load_records(role, document)?
            }
            DocumentRole::ApplicationGroupAssignments => {
                self.application_group_assignments = load_records(role, document)?
            }
            DocumentRole::ExcludedLogins => self.excluded_logins = load_excluded_logins(document)?,
            DocumentRole::HcapUsers => self.hcap_users = load_records(role, document)?,
            DocumentRole::Backup => {
                return Err(MigrationError::Malformed {
                    role,
                    detail: "the backup document is split, not exported directly".into(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_top_level_array() {
        let users: Vec<User> = load_records(
            DocumentRole::Users,
            json!([{"Id": "u1"}, {"Id": "u2"}]),
        )
        .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id.as_deref(), Some("u2"));
    }

    #[test]
    fn test_value_wrapped_array() {
        let tenants: Vec<Tenant> = load_records(
            DocumentRole::ClipperTenants,
            json!({"value": [{"Id": "t1", "Name": "Tenant One"}]}),
        )
        .unwrap();
        assert_eq!(tenants.len(), 1);
        assert_eq!(tenants[0].name.as_deref(), Some("Tenant One"));
    }

    #[test]
    fn test_single_object_is_one_record() {
        let apps: Vec<Application> =
            load_records(DocumentRole::Applications, json!({"Id": "app1"})).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id.as_deref(), Some("app1"));
    }

    #[test]
    fn test_scalar_document_is_malformed() {
        let err = load_records::<User>(DocumentRole::Users, json!("users")).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Malformed {
                role: DocumentRole::Users,
                ..
            }
        ));
    }

    #[test]
    fn test_non_array_value_is_malformed() {
        let err =
            load_records::<Tenant>(DocumentRole::ClipperTenants, json!({"value": {"Id": "t1"}}))
                .unwrap_err();
        assert!(err.to_string().contains("`value` must be an array"));
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let groups: Vec<Group> =
            load_records(DocumentRole::Groups, json!([{"Id": "g1"}, "junk", 42, null])).unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_wrongly_typed_record_is_fatal() {
        let err = load_records::<User>(DocumentRole::Users, json!([{"Id": "u1"}, {"IsActive": "yes"}]))
            .unwrap_err();
        assert!(matches!(err, MigrationError::Record { index: 1, .. }));
    }

    #[test]
    fn test_excluded_logins() {
        let logins = load_excluded_logins(json!(["alice", "bob", "alice"])).unwrap();
        assert_eq!(logins.len(), 2);
        assert!(logins.contains("bob"));

        let err = load_excluded_logins(json!(["alice", 7])).unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn test_read_document_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(DocumentRole::Groups, &dir.path().join("groups.json")).unwrap_err();
        assert!(matches!(err, MigrationError::Read { .. }));
    }

    #[test]
    fn test_read_document_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, "[{").unwrap();
        let err = read_document(DocumentRole::Groups, &path).unwrap_err();
        assert!(matches!(err, MigrationError::Parse { .. }));
    }
}
