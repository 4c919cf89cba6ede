// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static tenant directory and bearer credential resolution.
//!
//! Loaded once at startup from `--tenants <path>` and never mutated. Each
//! tenant has a shared-secret credential and an optional device allow-list.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// On-disk shape of a single tenant entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantSpec {
    /// Bearer credential presented by this tenant's callers and listeners.
    #[serde(alias = "credential")]
    pub bearer: String,
    /// Optional device allow-list. Absent means any device is permitted.
    #[serde(default, alias = "devices", skip_serializing_if = "Option::is_none")]
    pub macs: Option<Vec<String>>,
}

/// A loaded tenant.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub name: String,
    credential: String,
    /// Upper-cased device identifiers; `None` permits everything.
    allowed_devices: Option<HashSet<String>>,
}

impl Tenant {
    pub fn new(name: impl Into<String>, spec: TenantSpec) -> Self {
        let allowed_devices = spec
            .macs
            .map(|macs| macs.iter().map(|m| normalize_device(m)).collect::<HashSet<_>>());
        Self { name: name.into(), credential: spec.bearer, allowed_devices }
    }

    /// Whether `device` may be triggered for this tenant.
    ///
    /// Comparison ignores ASCII case and nothing else; surrounding
    /// whitespace is significant.
    pub fn permits(&self, device: &str) -> bool {
        match self.allowed_devices {
            None => true,
            Some(ref allowed) => allowed.contains(&normalize_device(device)),
        }
    }

    pub fn has_allow_list(&self) -> bool {
        self.allowed_devices.is_some()
    }
}

fn normalize_device(device: &str) -> String {
    device.to_ascii_uppercase()
}

/// Immutable name → tenant mapping.
#[derive(Debug, Clone, Default)]
pub struct TenantDirectory {
    tenants: BTreeMap<String, Tenant>,
}

impl TenantDirectory {
    /// Build a directory, rejecting empty or duplicate credentials.
    pub fn from_specs(specs: BTreeMap<String, TenantSpec>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        let mut tenants = BTreeMap::new();
        for (name, spec) in specs {
            if name.is_empty() {
                anyhow::bail!("tenant name must not be empty");
            }
            if spec.bearer.is_empty() {
                anyhow::bail!("tenant {name}: bearer credential must not be empty");
            }
            if !seen.insert(spec.bearer.clone()) {
                anyhow::bail!("tenant {name}: bearer credential is shared with another tenant");
            }
            tenants.insert(name.clone(), Tenant::new(name, spec));
        }
        Ok(Self { tenants })
    }

    /// Parse a directory from its JSON representation.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let specs: BTreeMap<String, TenantSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    /// Read and parse a directory file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        Self::from_json(&contents).map_err(|e| anyhow::anyhow!("parsing {}: {e:#}", path.display()))
    }

    pub fn get(&self, name: &str) -> Option<&Tenant> {
        self.tenants.get(name)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    /// Resolve a presented credential to its tenant name.
    ///
    /// Every tenant is compared in constant time and the scan never stops
    /// early, so response timing does not depend on which tenant matched.
    pub fn resolve(&self, presented: &str) -> Option<&str> {
        let mut found = None;
        for tenant in self.tenants.values() {
            if constant_time_eq(presented, &tenant.credential) && found.is_none() {
                found = Some(tenant.name.as_str());
            }
        }
        found
    }
}

/// Constant-time string comparison to prevent timing side-channel attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

#[cfg(test)]
#[path = "tenant_tests.rs"]
mod tests;
