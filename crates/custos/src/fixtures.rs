use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use custos_core::Resource;
use custos_policy::{ProviderRegistry, StaticProvider};

use crate::error::{RootError, RootResult};

/// Fixture document: resource inventories keyed by resource type, used to
/// validate and dry-run policies offline against a known environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDocument {
    pub resources: BTreeMap<String, FixtureProvider>,
}

/// One fixture-backed provider: declared permissions, an availability
/// flag, and a fixed resource inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureProvider {
    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default = "default_available")]
    pub available: bool,

    #[serde(default)]
    pub resources: Vec<Resource>,
}

fn default_available() -> bool {
    true
}

/// Load a JSON fixture document from disk.
pub fn load_fixtures(path: &Path) -> RootResult<FixtureDocument> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| RootError::Config(format!("{}: {}", path.display(), e)))?;
    let document: FixtureDocument = serde_json::from_str(&contents)?;
    Ok(document)
}

/// Build a provider registry of `StaticProvider`s from a fixture document.
pub fn registry_from_fixtures(document: &FixtureDocument) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for (resource_type, fixture) in &document.resources {
        let mut provider = StaticProvider::new(resource_type.clone())
            .with_permissions(fixture.permissions.clone())
            .with_resources(fixture.resources.clone());
        if !fixture.available {
            provider = provider.unavailable();
        }
        registry.register(Arc::new(provider));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = r#"{
        "resources": {
            "ec2": {
                "permissions": ["ec2:DescribeInstances"],
                "resources": [{"id": "i-123", "state": "running"}]
            },
            "account": {
                "resources": [{"id": "acct-1"}]
            },
            "rds": {
                "available": false
            }
        }
    }"#;

    #[test]
    fn test_parse_fixture_document() {
        let doc: FixtureDocument = serde_json::from_str(FIXTURES).unwrap();
        assert_eq!(doc.resources.len(), 3);
        assert!(doc.resources["ec2"].available);
        assert!(!doc.resources["rds"].available);
        assert_eq!(doc.resources["ec2"].resources[0].id, "i-123");
        assert_eq!(
            doc.resources["ec2"].resources[0].attribute("state"),
            Some(&serde_json::json!("running"))
        );
    }

    #[test]
    fn test_registry_from_fixtures() {
        let doc: FixtureDocument = serde_json::from_str(FIXTURES).unwrap();
        let registry = registry_from_fixtures(&doc);
        assert_eq!(registry.types(), vec!["account", "ec2", "rds"]);
        assert!(registry.get("ec2").is_some());
    }

    #[test]
    fn test_load_fixtures_from_file() {
        let dir = std::env::temp_dir().join("custos-test-fixtures");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fixtures.json");
        std::fs::write(&path, FIXTURES).unwrap();

        let doc = load_fixtures(&path).unwrap();
        assert_eq!(doc.resources.len(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_fixtures_missing_file() {
        let result = load_fixtures(Path::new("/nonexistent/fixtures.json"));
        assert!(matches!(result, Err(RootError::Config(_))));
    }

    #[test]
    fn test_fixture_rejects_unknown_fields() {
        let result = serde_json::from_str::<FixtureDocument>(
            r#"{"resources": {}, "sessions": {}}"#,
        );
        assert!(result.is_err());
    }
}
