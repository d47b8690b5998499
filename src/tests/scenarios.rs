use std::{collections::BTreeMap, path::Path};

use crate::{
    backup::split_backup_file,
    config::MigrationConfig,
    export::ExportStrategy,
    pipeline::{run_all, run_export},
};

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn config_for(input: &Path, output: &Path) -> MigrationConfig {
    let mut config = MigrationConfig::default();
    config.inputs.directory = input.to_path_buf();
    config.outputs.directory = output.to_path_buf();
    config
}

/// Header → value view of every data row in a CSV file.
fn read_rows(path: &Path) -> Vec<BTreeMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect()
        })
        .collect()
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                std::fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

const GUID_A: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
const GUID_B: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

/// A small but complete backup covering every input document.
fn write_full_backup(dir: &Path) {
    write(
        dir,
        "applications.json",
        &format!(
            r#"{{"value": [
                {{"Id": "app1", "Name": "App One", "ApplicationType": "Browser",
                  "AuthenticationFlows": "Implicit", "TenantIds": ["t1", "t2", "t-unknown"]}},
                {{"Id": "app2", "Name": "Reporting, Finance", "ApplicationType": "Service",
                  "AuthenticationFlows": "ClientCredentials", "TenantIds": ["t2"],
                  "RedirectUris": ["https://r.test/a", null]}},
                {{"Id": "app3", "Name": "App One", "Description": "duplicate"}}
            ]}}"#
        ),
    );
    write(
        dir,
        "authorizationservers.json",
        &format!(
            r#"[
                {{"Name": "Acme", "OrganizationId": "{GUID_A}",
                  "Policies": [{{"Applications": ["app1", "app3"]}}]}},
                {{"Name": "Globex", "OrganizationId": "org-short",
                  "Policies": [{{"Applications": ["app2"]}}]}}
            ]"#
        ),
    );
    write(
        dir,
        "clipperTenants.json",
        &format!(
            r#"{{"value": [
                {{"Id": "t1", "Name": "Acme Prod", "OrganizationId": "{GUID_A}", "Region": "West Europe"}},
                {{"Id": "t2", "Name": "Shared", "OrganizationId": "{GUID_B}", "Region": "UAE North"}}
            ]}}"#
        ),
    );
    write(
        dir,
        "clipperOrgs.json",
        &format!(
            r#"{{"value": [
                {{"Id": "{GUID_A}", "Name": "Acme Clipper", "IsActive": true}},
                {{"Id": "{GUID_B}", "Name": "Initech", "IsActive": false}}
            ]}}"#
        ),
    );
    write(
        dir,
        "users.json",
        &format!(
            r#"[
                {{"Id": "u1", "Login": "jane.doe@acme.test", "Email": "jane.doe@acme.test",
                  "IsActive": true, "OrganizationId": "{GUID_A}", "AdminRoles": "All"}},
                {{"Id": "u2", "Login": "peter@initech.test", "FirstName": "Peter",
                  "LastName": "Gibbons", "OrganizationId": "{GUID_B}"}},
                {{"Id": "u3", "Login": "ghost@nowhere.test", "OrganizationId": "missing"}}
            ]"#
        ),
    );
    write(
        dir,
        "groups.json",
        &format!(
            r#"[
                {{"Id": "g1", "Name": "Acme Admins", "OrganizationId": "{GUID_A}"}},
                {{"Id": "g2", "Name": "Initech Staff", "OrganizationId": "{GUID_B}"}},
                {{"Id": "g3", "Name": "Broken", "OrganizationId": "not-a-guid"}}
            ]"#
        ),
    );
    write(
        dir,
        "usergroupassignments.json",
        r#"[
            {"UserId": "u1", "GroupId": "g1"},
            {"UserId": "u2", "GroupId": "g2"},
            {"UserId": "u2", "GroupId": "g-deleted"},
            {"UserId": "u1", "GroupId": "g3"}
        ]"#,
    );
    write(
        dir,
        "applicationgroupassignments.json",
        r#"[
            {"GroupId": "g1", "ApplicationName": "App One"},
            {"GroupId": "g1", "ApplicationName": "Reporting, Finance"},
            {"GroupId": "g3", "ApplicationName": "App One"}
        ]"#,
    );
    write(dir, "myUsers.json", r#"["nobody@acme.test"]"#);
    write(
        dir,
        "HCAPUsersWithouID.json",
        r#"{"value": [{"SPFLoginName": "peter@initech.test"}, {"SPFLoginName": "new.hire@acme.test"}]}"#,
    );
}

#[test]
fn test_acme_application_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(
        input.path(),
        "authorizationservers.json",
        r#"[{"Name":"Acme","Policies":[{"Applications":["app1"]}]}]"#,
    );
    write(
        input.path(),
        "applications.json",
        r#"{"Id":"app1","Name":"App One","ApplicationType":"Browser","AuthenticationFlows":"Implicit"}"#,
    );

    let config = config_for(input.path(), output.path());
    let report = run_export(&config, ExportStrategy::Applications).unwrap();

    let rows = read_rows(&report.files[0]);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["Name"], "App One");
    assert_eq!(row["Organization"], "Acme");
    assert_eq!(row["Type"], "Browser");
    assert_eq!(row["Refresh Token"], "True");
    assert_eq!(row["Implicit"], "True");
    assert_eq!(row["Authorization Code"], "False");
    assert_eq!(row["Client Credentials"], "False");
    assert_eq!(row["Resource Owner"], "False");
}

#[test]
fn test_null_policy_application_does_not_abort_export() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(
        input.path(),
        "authorizationservers.json",
        r#"[{"Name":"Acme","Policies":[{"Applications":["app1",null]}]}]"#,
    );
    write(
        input.path(),
        "applications.json",
        r#"[{"Id":"app1","Name":"App One"}]"#,
    );

    let config = config_for(input.path(), output.path());
    let report = run_export(&config, ExportStrategy::Applications).unwrap();

    let rows = read_rows(&report.files[0]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Organization"], "Acme");
}

#[test]
fn test_output_uses_crlf_and_minimal_quoting() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_full_backup(input.path());

    let config = config_for(input.path(), output.path());
    let report = run_export(&config, ExportStrategy::Applications).unwrap();

    let bytes = std::fs::read(&report.files[0]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), 3);
    assert!(!text.replace("\r\n", "").contains('\n'));
    assert!(lines[2].starts_with("\"Reporting, Finance\","));
    assert!(lines[2].contains(",\"https://r.test/a,\","));
}

#[test]
fn test_full_backup_row_counts() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_full_backup(input.path());

    let config = config_for(input.path(), output.path());
    let reports = run_all(&config).unwrap();

    let rows: BTreeMap<&str, usize> = reports
        .iter()
        .map(|r| (r.strategy.as_str(), r.rows))
        .collect();
    assert_eq!(reports.len(), ExportStrategy::ALL.len());
    // app1 resolves t1 and t2, app2 resolves t2, app3 has no tenants
    assert_eq!(rows["applications-by-tenant"], 3);
    assert_eq!(rows["applications"], 2);
    // app2 belongs to an organization without a clipper counterpart
    assert_eq!(rows["applications-by-clipper-organization"], 2);
    assert_eq!(rows["groups-by-application"], 2);
    // g1 (u1) and g2 (u2); g3 is excluded
    assert_eq!(rows["group-user-files"], 2);
    assert_eq!(rows["users"], 2);
    // u2 keeps a row for the deleted group g-deleted
    assert_eq!(rows["users-by-group"], 4);
    assert_eq!(rows["user-ids"], 2);
    assert_eq!(rows["hcap-users"], 2);
    assert_eq!(rows["unnamed-users"], 2);
    assert_eq!(rows["tenants"], 2);
    assert_eq!(rows["organizations"], 2);

    assert!(output.path().join("group-user-rel-Acme_Admins.csv").exists());
    assert!(output.path().join("group-user-rel-Initech_Staff.csv").exists());
    assert!(!output.path().join("group-user-rel-Broken.csv").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_full_backup(input.path());
    let config = config_for(input.path(), output.path());

    run_all(&config).unwrap();
    let first = snapshot(output.path());
    run_all(&config).unwrap();
    let second = snapshot(output.path());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_users_by_group_file_contents() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_full_backup(input.path());

    let config = config_for(input.path(), output.path());
    let report = run_export(&config, ExportStrategy::UsersByGroup).unwrap();

    let rows = read_rows(&report.files[0]);
    let summary: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|r| {
            (
                r["Login name"].as_str(),
                r["Group"].as_str(),
                r["Organization"].as_str(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("jane.doe@acme.test", "Acme Admins", "Acme"),
            ("jane.doe@acme.test", "Broken", "Acme"),
            ("peter@initech.test", "Initech Staff", "Initech"),
            ("peter@initech.test", "Unknown Group", "Initech"),
        ]
    );
    assert_eq!(rows[0]["First Name"], "Jane");
    assert_eq!(rows[0]["Last Name"], "DOE");
    assert_eq!(rows[0]["System Admin"], "True");
}

#[test]
fn test_split_backup_then_export() {
    let work = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(
        work.path(),
        "backup.json",
        r#"{
            "Applications": [{"Id": "app1", "Name": "App One"}],
            "AuthorizationServers": [{"Name": "Acme", "Policies": [{"Applications": ["app1"]}]}],
            "Settings": {}
        }"#,
    );

    let written = split_backup_file(&work.path().join("backup.json"), work.path()).unwrap();
    assert_eq!(written.len(), 2);

    let config = config_for(work.path(), output.path());
    let report = run_export(&config, ExportStrategy::Applications).unwrap();

    let rows = read_rows(&report.files[0]);
    assert_eq!(rows[0]["Organization"], "Acme");
    assert_eq!(rows[0]["Type"], "Web");
}
