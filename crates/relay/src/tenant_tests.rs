// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::*;

const SAMPLE: &str = r#"{
    "EXAMPLE-1": { "bearer": "CHANGE_ME" },
    "EXAMPLE-2": { "bearer": "CHANGE_ME_2", "macs": ["AA:AA:AA:AA:AA:AA"] }
}"#;

#[test]
fn resolves_known_credentials() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(SAMPLE)?;
    assert_eq!(dir.len(), 2);
    assert_eq!(dir.resolve("CHANGE_ME"), Some("EXAMPLE-1"));
    assert_eq!(dir.resolve("CHANGE_ME_2"), Some("EXAMPLE-2"));
    Ok(())
}

#[test]
fn unknown_credential_fails() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(SAMPLE)?;
    assert_eq!(dir.resolve("CHANGE_ME_3"), None);
    assert_eq!(dir.resolve(""), None);
    assert_eq!(dir.resolve("change_me"), None);
    Ok(())
}

#[test]
fn tenant_without_allow_list_permits_any_device() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(SAMPLE)?;
    let tenant = dir.get("EXAMPLE-1").ok_or_else(|| anyhow::anyhow!("missing tenant"))?;
    assert!(!tenant.has_allow_list());
    assert!(tenant.permits("AA:AA:AA:AA:AA:AA"));
    assert!(tenant.permits("anything at all"));
    Ok(())
}

#[test]
fn allow_list_is_enforced_case_insensitively() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(SAMPLE)?;
    let tenant = dir.get("EXAMPLE-2").ok_or_else(|| anyhow::anyhow!("missing tenant"))?;
    assert!(tenant.permits("AA:AA:AA:AA:AA:AA"));
    assert!(tenant.permits("aa:aa:aa:aa:aa:aa"));
    assert!(!tenant.permits("BB:BB:BB:BB:BB:BB"));
    Ok(())
}

#[test]
fn allow_list_does_not_ignore_whitespace() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(SAMPLE)?;
    let tenant = dir.get("EXAMPLE-2").ok_or_else(|| anyhow::anyhow!("missing tenant"))?;
    assert!(!tenant.permits(" AA:AA:AA:AA:AA:AA "));
    assert!(!tenant.permits("AA:AA:AA:AA:AA:AA\t"));
    assert!(!tenant.permits("\nAA:AA:AA:AA:AA:AA"));
    Ok(())
}

#[test]
fn empty_allow_list_permits_nothing() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(r#"{"locked": {"bearer": "k", "macs": []}}"#)?;
    let tenant = dir.get("locked").ok_or_else(|| anyhow::anyhow!("missing tenant"))?;
    assert!(!tenant.permits("AA:AA:AA:AA:AA:AA"));
    Ok(())
}

#[test]
fn aliases_are_accepted() -> anyhow::Result<()> {
    let dir = TenantDirectory::from_json(
        r#"{"home": {"credential": "s3cret", "devices": ["11:22:33:44:55:66"]}}"#,
    )?;
    assert_eq!(dir.resolve("s3cret"), Some("home"));
    Ok(())
}

#[test]
fn duplicate_credentials_are_rejected() {
    let result = TenantDirectory::from_json(r#"{"a": {"bearer": "same"}, "b": {"bearer": "same"}}"#);
    assert!(result.is_err());
}

#[test]
fn empty_credential_is_rejected() {
    assert!(TenantDirectory::from_json(r#"{"a": {"bearer": ""}}"#).is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(TenantDirectory::from_json(r#"{"a": {"bearer": "x", "mac": []}}"#).is_err());
}

#[test]
fn load_reads_file() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SAMPLE.as_bytes())?;
    let dir = TenantDirectory::load(file.path())?;
    assert_eq!(dir.len(), 2);
    Ok(())
}

#[test]
fn load_missing_file_errors() {
    let path = std::env::temp_dir().join("wol-relay-definitely-missing.json");
    assert!(TenantDirectory::load(&path).is_err());
}

#[test]
fn constant_time_eq_basics() {
    assert!(constant_time_eq("abc", "abc"));
    assert!(!constant_time_eq("abc", "abd"));
    assert!(!constant_time_eq("abc", "abcd"));
}
