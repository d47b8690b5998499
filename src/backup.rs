//! Splits a full platform backup into the per-collection documents the
//! export strategies read.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};

use crate::{
    document::{DocumentRole, read_document},
    error::{MigrationError, MigrationResult},
};

/// Backup keys that are extracted, in extraction order.
pub const BACKUP_COLLECTIONS: [&str; 4] = ["Applications", "Groups", "Users", "AuthorizationServers"];

/// Write each collection present in `backup` to `<key lowercased>.json` in
/// `dir`, indented with four spaces. Absent collections are skipped.
pub fn split_backup(backup: &Value, dir: &Path) -> MigrationResult<Vec<PathBuf>> {
    let Value::Object(collections) = backup else {
        return Err(MigrationError::Malformed {
            role: DocumentRole::Backup,
            detail: "the backup must be a JSON object".into(),
        });
    };

    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for key in BACKUP_COLLECTIONS {
        let Some(collection) = collections.get(key) else {
            tracing::debug!(key, "Backup has no such collection");
            continue;
        };

        let path = dir.join(format!("{}.json", key.to_lowercase()));
        std::fs::write(&path, to_indented_json(collection)?)?;
        tracing::info!(key, path = %path.display(), "Extracted backup collection");
        written.push(path);
    }

    Ok(written)
}

/// Read the backup file at `path` and split it into `dir`.
pub fn split_backup_file(path: &Path, dir: &Path) -> MigrationResult<Vec<PathBuf>> {
    let backup = read_document(DocumentRole::Backup, path)?;
    split_backup(&backup, dir)
}

fn to_indented_json(value: &Value) -> MigrationResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|source| MigrationError::Io(source.into()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_split_writes_present_collections() {
        let dir = tempfile::tempdir().unwrap();
        let backup = json!({
            "Applications": [{"Id": "a1"}],
            "Users": [],
            "AuthorizationServers": [{"Name": "Acme"}],
            "Unrelated": {"ignored": true}
        });

        let written = split_backup(&backup, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("applications.json"),
                dir.path().join("users.json"),
                dir.path().join("authorizationservers.json"),
            ]
        );
        assert!(!dir.path().join("groups.json").exists());
        assert!(!dir.path().join("unrelated.json").exists());
    }

    #[test]
    fn test_split_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let backup = json!({"Applications": [{"Id": "a1"}]});

        split_backup(&backup, dir.path()).unwrap();

        let written = std::fs::read_to_string(dir.path().join("applications.json")).unwrap();
        assert_eq!(written, "[\n    {\n        \"Id\": \"a1\"\n    }\n]");
    }

    #[test]
    fn test_split_output_reloads_as_document() {
        let dir = tempfile::tempdir().unwrap();
        let backup = json!({"Users": [{"Id": "u1", "Login": "user@x.test"}]});

        split_backup(&backup, dir.path()).unwrap();

        let users = read_document(DocumentRole::Users, &dir.path().join("users.json")).unwrap();
        assert_eq!(users, json!([{"Id": "u1", "Login": "user@x.test"}]));
    }

    #[test]
    fn test_non_object_backup_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let err = split_backup(&json!([1, 2]), dir.path()).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::Malformed {
                role: DocumentRole::Backup,
                ..
            }
        ));
    }

    #[test]
    fn test_split_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let backup_path = dir.path().join("backup.json");
        std::fs::write(&backup_path, r#"{"Groups": [{"Id": "g1"}]}"#).unwrap();
        let out = dir.path().join("split");

        let written = split_backup_file(&backup_path, &out).unwrap();

        assert_eq!(written, vec![out.join("groups.json")]);
    }
}
