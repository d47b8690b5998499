//! Configuration for a migration run.
//!
//! A run is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax. Every section is
//! optional; the defaults reproduce the file layout the migration has always
//! used, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```toml
//! [inputs]
//! directory = "${BACKUP_DIR}"
//!
//! [outputs]
//! directory = "out"
//!
//! [export.hosting_groups]
//! "West Europe" = "Azure-HXGN-Sandbox-WEU"
//! ```

mod export;
mod inputs;
mod observability;
mod outputs;

use std::path::Path;

pub use export::*;
pub use inputs::*;
pub use observability::*;
pub use outputs::*;
use serde::{Deserialize, Serialize};

/// Root configuration of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct MigrationConfig {
    /// Input document locations.
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Output directory and file names.
    #[serde(default)]
    pub outputs: OutputsConfig,

    /// Literal values written into exported rows.
    #[serde(default)]
    pub export: ExportSettings,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl MigrationConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: MigrationConfig = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.outputs.validate()?;
        self.export.validate()?;
        Ok(())
    }

    /// Generate the JSON schema for the configuration file.
    #[cfg(feature = "json-schema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MigrationConfig)
    }

    /// Generate the JSON schema as a pretty-printed JSON string.
    #[cfg(feature = "json-schema")]
    pub fn json_schema_string() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::json_schema())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Starter configuration written by `idmigrate init`.
pub fn default_config_toml() -> &'static str {
    r#"# idmigrate configuration
# Every value below is the built-in default; delete what you do not change.

[inputs]
# Relative input paths resolve against this directory.
directory = "."
applications = "applications.json"
users = "users.json"
groups = "groups.json"
authorization_servers = "authorizationservers.json"
clipper_organizations = "clipperOrgs.json"
clipper_tenants = "clipperTenants.json"
user_group_assignments = "usergroupassignments.json"
application_group_assignments = "applicationgroupassignments.json"
excluded_logins = "myUsers.json"
hcap_users = "HCAPUsersWithouID.json"
backup = "backup.json"

[outputs]
directory = "out"
group_file_prefix = "group-user-rel-"

[export]
product = "SDx MT Cloud"
product_version = "1"
provider_type = "Federation"
login_prefix = "USR_"
unknown_group = "Unknown Group"

[export.hosting_groups]
"Central US" = "Azure-HXGN-Sandbox-CUS"
"West Europe" = "Azure-HXGN-Sandbox-WEU"
"Southeast Asia" = "Azure-HXGN-Sandbox-SA"
"UAE North" = "Azure-HXGN-Sandbox-UAE"

[observability.logging]
level = "info"
format = "compact"
# filter = "idmigrate::export=debug"
"#
}

/// Expand environment variables in the format `${VAR_NAME}`.
/// Variables after a `#` on the same line are left untouched.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ConfigError::Validation(format!("invalid variable pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());

    for line in input.lines() {
        let comment_pos = line.find('#');

        let mut line_result = String::with_capacity(line.len());
        let mut last_end = 0;

        for cap in re.captures_iter(line) {
            let Some(whole) = cap.get(0) else {
                continue;
            };

            if let Some(pos) = comment_pos
                && whole.start() >= pos
            {
                continue;
            }

            line_result.push_str(&line[last_end..whole.start()]);

            let var_name = &cap[1];
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            line_result.push_str(&value);

            last_end = whole.end();
        }

        line_result.push_str(&line[last_end..]);
        result.push_str(&line_result);
        result.push('\n');
    }

    // Remove trailing newline if input didn't have one
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MigrationConfig::from_str("").unwrap();

        assert_eq!(config, MigrationConfig::default());
        assert_eq!(config.outputs.group_file_prefix, "group-user-rel-");
        assert_eq!(config.export.login_prefix, "USR_");
    }

    #[test]
    fn test_default_config_toml_matches_defaults() {
        let config = MigrationConfig::from_str(default_config_toml()).unwrap();

        assert_eq!(config, MigrationConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = MigrationConfig::from_str(
            r#"
            [inputs]
            directory = "/srv/backup"

            [outputs]
            users = "migrated-users.csv"

            [export]
            product = "Other Product"
        "#,
        )
        .unwrap();

        assert_eq!(config.inputs.directory, PathBuf::from("/srv/backup"));
        assert_eq!(config.inputs.users, PathBuf::from("users.json"));
        assert_eq!(config.outputs.users, "migrated-users.csv");
        assert_eq!(config.outputs.tenants, "tenants.csv");
        assert_eq!(config.export.product, "Other Product");
        assert_eq!(config.export.provider_type, "Federation");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = MigrationConfig::from_str(
            r#"
            [outputs]
            user = "typo.csv"
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_runs_on_parse() {
        let err = MigrationConfig::from_str(
            r#"
            [outputs]
            groups_by_application = ""
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = MigrationConfig::from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Io(_, p) if p == path));
    }

    #[test]
    fn test_env_var_expansion() {
        temp_env::with_var("TEST_BACKUP_DIR", Some("/mnt/export"), || {
            let config = MigrationConfig::from_str(
                r#"
                [inputs]
                directory = "${TEST_BACKUP_DIR}"
            "#,
            )
            .unwrap();
            assert_eq!(config.inputs.directory, PathBuf::from("/mnt/export"));
        });
    }

    #[test]
    fn test_env_var_missing() {
        temp_env::with_var_unset("TEST_IDMIGRATE_UNSET", || {
            let err = expand_env_vars("directory = \"${TEST_IDMIGRATE_UNSET}\"").unwrap_err();
            assert!(matches!(err, ConfigError::EnvVarNotFound(name) if name == "TEST_IDMIGRATE_UNSET"));
        });
    }

    #[test]
    fn test_env_var_in_comment_ignored() {
        let result = expand_env_vars("# directory = \"${NONEXISTENT_VAR}\"").unwrap();
        assert_eq!(result, "# directory = \"${NONEXISTENT_VAR}\"");
    }

    #[test]
    fn test_env_var_before_comment_expanded() {
        temp_env::with_var("TEST_BEFORE_COMMENT", Some("expanded"), || {
            let result =
                expand_env_vars("key = \"${TEST_BEFORE_COMMENT}\" # ${NONEXISTENT}").unwrap();
            assert_eq!(result, "key = \"expanded\" # ${NONEXISTENT}");
        });
    }

    #[test]
    fn test_multiline_with_comments() {
        temp_env::with_var("TEST_MULTI", Some("value1"), || {
            let input = r#"key1 = "${TEST_MULTI}"
# key2 = "${NONEXISTENT}"
key3 = "literal""#;
            let result = expand_env_vars(input).unwrap();
            assert_eq!(
                result,
                r#"key1 = "value1"
# key2 = "${NONEXISTENT}"
key3 = "literal""#
            );
        });
    }
}
