use custos_core::{Event, PermissionSet, Resource, ResourceSet};

use crate::config::{ValueConfig, ValueOp};
use crate::error::{PolicyError, PolicyResult};

/// Attribute comparison filter: keeps resources whose `key` attribute
/// satisfies `op` against `value`.
pub struct ValueFilter {
    key: String,
    value: Option<serde_json::Value>,
    op: ValueOp,
}

impl ValueFilter {
    pub fn validate(config: ValueConfig) -> PolicyResult<Self> {
        match config.op {
            ValueOp::Eq | ValueOp::Ne if config.value.is_none() => {
                return Err(PolicyError::Validation(format!(
                    "value filter on '{}': op requires a value",
                    config.key
                )));
            }
            ValueOp::Present | ValueOp::Absent if config.value.is_some() => {
                return Err(PolicyError::Validation(format!(
                    "value filter on '{}': presence op takes no value",
                    config.key
                )));
            }
            _ => {}
        }
        Ok(Self {
            key: config.key,
            value: config.value,
            op: config.op,
        })
    }

    pub fn permissions(&self) -> PermissionSet {
        PermissionSet::new()
    }

    pub fn process(
        &self,
        resources: ResourceSet,
        _event: Option<&Event>,
    ) -> PolicyResult<ResourceSet> {
        Ok(resources.into_iter().filter(|r| self.matches(r)).collect())
    }

    fn matches(&self, resource: &Resource) -> bool {
        let attribute = resource.attribute(&self.key);
        match self.op {
            ValueOp::Eq => attribute == self.value.as_ref(),
            ValueOp::Ne => attribute != self.value.as_ref(),
            ValueOp::Present => attribute.is_some(),
            ValueOp::Absent => attribute.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(key: &str, value: Option<serde_json::Value>, op: ValueOp) -> ValueFilter {
        ValueFilter::validate(ValueConfig {
            key: key.into(),
            value,
            op,
        })
        .unwrap()
    }

    fn resources() -> ResourceSet {
        vec![
            Resource::new("i-1").with_attribute("state", "running"),
            Resource::new("i-2").with_attribute("state", "stopped"),
            Resource::new("i-3"),
        ]
    }

    #[test]
    fn test_eq_keeps_matching() {
        let f = filter("state", Some("running".into()), ValueOp::Eq);
        let out = f.process(resources(), None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "i-1");
    }

    #[test]
    fn test_ne_drops_matching() {
        let f = filter("state", Some("running".into()), ValueOp::Ne);
        let out = f.process(resources(), None).unwrap();
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i-2", "i-3"]);
    }

    #[test]
    fn test_present_and_absent() {
        let f = filter("state", None, ValueOp::Present);
        assert_eq!(f.process(resources(), None).unwrap().len(), 2);

        let f = filter("state", None, ValueOp::Absent);
        let out = f.process(resources(), None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "i-3");
    }

    #[test]
    fn test_eq_without_value_rejected() {
        let result = ValueFilter::validate(ValueConfig {
            key: "state".into(),
            value: None,
            op: ValueOp::Eq,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_present_with_value_rejected() {
        let result = ValueFilter::validate(ValueConfig {
            key: "state".into(),
            value: Some("running".into()),
            op: ValueOp::Present,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_no_permissions() {
        let f = filter("state", None, ValueOp::Present);
        assert!(f.permissions().is_empty());
    }
}
