use serde::{Deserialize, Serialize};

/// A policy document: the top-level unit the loader consumes, whether it
/// came from a file or was assembled in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    pub policies: Vec<PolicyConfig>,
}

/// Raw configuration of one policy. Immutable once deserialized; anything
/// deriving a new policy from it (the embedded-policy builder) clones it
/// rather than mutating it in place.
///
/// `resource` is the only required field. Serde field requirements and
/// `deny_unknown_fields` are the declared schema: a `policy` fragment
/// without `resource` is rejected at deserialization, before any
/// component-level validation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Policy name. Required for top-level policies (the loader enforces
    /// this); embedded policies have it injected by the builder.
    #[serde(default)]
    pub name: Option<String>,

    /// Resource-type identifier (e.g. `"ec2"`).
    pub resource: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Execution mode. Absent means synchronous pull evaluation.
    #[serde(default)]
    pub mode: Option<ModeConfig>,

    #[serde(default)]
    pub filters: Vec<FilterConfig>,

    #[serde(default)]
    pub actions: Vec<ActionConfig>,

    /// Disabled policies are skipped by the loader.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Execution mode for a top-level policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeConfig {
    #[serde(rename = "type")]
    pub kind: String,

    /// Schedule expression, required for `periodic` mode.
    #[serde(default)]
    pub schedule: Option<String>,
}

/// Mode kinds the engine understands.
pub const MODE_KINDS: &[&str] = &["pull", "periodic", "event"];

/// Raw configuration of one action. Actions are parsed so validation can
/// reason about their presence, but this engine does not execute them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Filter configuration, tagged by `type` the way policy files write it:
/// `{"type": "missing", "policy": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterConfig {
    Missing(MissingConfig),
    Value(ValueConfig),
}

/// Configuration of the absence (`missing`) filter: exactly one `policy`
/// fragment, which must itself contain `resource`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissingConfig {
    pub policy: PolicyConfig,
}

/// Configuration of the attribute comparison (`value`) filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueConfig {
    pub key: String,

    #[serde(default)]
    pub value: Option<serde_json::Value>,

    #[serde(default)]
    pub op: ValueOp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOp {
    #[default]
    Eq,
    Ne,
    Present,
    Absent,
}

/// Engine-level runtime options shared by every policy loaded in one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub account_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_config_minimal() {
        let config: PolicyConfig =
            serde_json::from_str(r#"{"name": "p1", "resource": "ec2"}"#).unwrap();
        assert_eq!(config.name.as_deref(), Some("p1"));
        assert_eq!(config.resource, "ec2");
        assert!(config.mode.is_none());
        assert!(config.filters.is_empty());
        assert!(config.actions.is_empty());
        assert!(config.enabled);
    }

    #[test]
    fn test_policy_config_rejects_unknown_fields() {
        let result = serde_json::from_str::<PolicyConfig>(
            r#"{"name": "p1", "resource": "ec2", "retries": 3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_config_requires_resource() {
        // Scenario: a `policy` fragment without `resource` never reaches
        // component-level validation.
        let result = serde_json::from_str::<PolicyConfig>(r#"{"name": "p1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_filter_config_parses() {
        let config: FilterConfig = serde_json::from_str(
            r#"{"type": "missing", "policy": {"resource": "ec2"}}"#,
        )
        .unwrap();
        match config {
            FilterConfig::Missing(m) => assert_eq!(m.policy.resource, "ec2"),
            other => panic!("expected missing filter, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_filter_config_requires_policy() {
        let result = serde_json::from_str::<FilterConfig>(r#"{"type": "missing"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_filter_config_rejects_extra_properties() {
        let result = serde_json::from_str::<FilterConfig>(
            r#"{"type": "missing", "policy": {"resource": "ec2"}, "extra": true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_filter_type_rejected() {
        let result = serde_json::from_str::<FilterConfig>(r#"{"type": "age", "days": 30}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mode_config_parses() {
        let config: ModeConfig =
            serde_json::from_str(r#"{"type": "periodic", "schedule": "rate(1 hour)"}"#).unwrap();
        assert_eq!(config.kind, "periodic");
        assert_eq!(config.schedule.as_deref(), Some("rate(1 hour)"));
    }

    #[test]
    fn test_value_config_defaults_to_eq() {
        let config: ValueConfig =
            serde_json::from_str(r#"{"key": "state", "value": "running"}"#).unwrap();
        assert_eq!(config.op, ValueOp::Eq);
    }

    #[test]
    fn test_embedded_policy_with_mode_parses_but_carries_mode() {
        // The forbidden-key constraint is a validation rule, not a schema
        // rule: the fragment parses, the builder rejects it.
        let config: FilterConfig = serde_json::from_str(
            r#"{"type": "missing",
                "policy": {"resource": "ec2", "mode": {"type": "periodic"}}}"#,
        )
        .unwrap();
        match config {
            FilterConfig::Missing(m) => assert!(m.policy.mode.is_some()),
            other => panic!("expected missing filter, got {:?}", other),
        }
    }

    #[test]
    fn test_document_roundtrip() {
        let doc = PolicyDocument {
            policies: vec![PolicyConfig {
                name: Some("p1".into()),
                resource: "account".into(),
                description: None,
                mode: None,
                filters: vec![FilterConfig::Value(ValueConfig {
                    key: "state".into(),
                    value: Some("active".into()),
                    op: ValueOp::Eq,
                })],
                actions: vec![],
                enabled: true,
            }],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let restored: PolicyDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.policies.len(), 1);
        assert_eq!(restored.policies[0].resource, "account");
    }
}
