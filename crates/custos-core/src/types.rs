use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Resource — one live cloud resource, as returned by a provider
// ---------------------------------------------------------------------------

/// A single enumerated resource. Providers return resources as an id plus
/// an open attribute map; filters never assume a fixed shape beyond that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,

    /// Provider-specific attributes (tags, state, region, ...).
    #[serde(default, flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Resource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: serde_json::Map::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// The ordered sequence of resources a policy or filter operates on.
pub type ResourceSet = Vec<Resource>;

// ---------------------------------------------------------------------------
// Event — opaque trigger payload
// ---------------------------------------------------------------------------

/// The payload that triggered an evaluation cycle, when there is one.
/// Filters accept it for interface symmetry; pull evaluation passes `None`.
pub type Event = serde_json::Value;

// ---------------------------------------------------------------------------
// PermissionSet — deterministic set of permission identifiers
// ---------------------------------------------------------------------------

/// Permission identifiers (e.g. `"ec2:DescribeInstances"`) required to
/// evaluate a policy. BTreeSet keeps the footprint deterministic when
/// reported or compared.
pub type PermissionSet = BTreeSet<String>;
