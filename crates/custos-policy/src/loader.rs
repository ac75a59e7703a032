use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use custos_core::SessionFactory;
use tracing::{debug, warn};

use crate::config::{PolicyDocument, RuntimeConfig};
use crate::error::{PolicyError, PolicyResult};
use crate::policy::{LoadedPolicy, PolicyContext};
use crate::provider::ProviderRegistry;

// ---------------------------------------------------------------------------
// SourceLocator — where a policy document came from
// ---------------------------------------------------------------------------

/// Origin of a policy document. `Memory` marks a non-persistent, in-memory
/// source: the loader works from the data it was handed and performs no
/// file or network discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Memory,
    File(PathBuf),
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocator::Memory => write!(f, "memory://"),
            SourceLocator::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// PolicyLoader — document → bound policies
// ---------------------------------------------------------------------------

/// Turns policy documents into `LoadedPolicy` values bound to a provider,
/// a session factory, and the engine runtime options.
pub struct PolicyLoader {
    registry: Arc<ProviderRegistry>,
    runtime: RuntimeConfig,
}

impl PolicyLoader {
    pub fn new(registry: Arc<ProviderRegistry>, runtime: RuntimeConfig) -> Self {
        Self { registry, runtime }
    }

    /// Load every enabled policy in the document. Each policy needs a name
    /// and a resource type known to the registry; disabled policies are
    /// skipped, which can legitimately leave the collection empty.
    pub fn load_data(
        &self,
        document: &PolicyDocument,
        source: SourceLocator,
        session_factory: Arc<dyn SessionFactory>,
    ) -> PolicyResult<PolicyCollection> {
        let mut policies = Vec::with_capacity(document.policies.len());

        for config in &document.policies {
            let name = config.name.clone().ok_or_else(|| {
                PolicyError::Load(format!(
                    "policy for resource '{}' from {} has no name",
                    config.resource, source
                ))
            })?;

            if !config.enabled {
                warn!(policy = %name, source = %source, "skipping disabled policy");
                continue;
            }

            let provider = self
                .registry
                .get(&config.resource)
                .ok_or_else(|| PolicyError::UnknownResourceType(config.resource.clone()))?;

            policies.push(LoadedPolicy {
                config: config.clone(),
                provider,
                ctx: PolicyContext {
                    policy_name: name,
                    session_factory: Arc::clone(&session_factory),
                    registry: Arc::clone(&self.registry),
                    runtime: self.runtime.clone(),
                },
            });
        }

        debug!(source = %source, count = policies.len(), "loaded policy document");
        Ok(PolicyCollection { policies })
    }

    /// Load a JSON policy document from disk.
    pub fn load_file(
        &self,
        path: &Path,
        session_factory: Arc<dyn SessionFactory>,
    ) -> PolicyResult<PolicyCollection> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PolicyError::Load(format!("{}: {}", path.display(), e)))?;
        let document: PolicyDocument = serde_json::from_str(&contents)?;
        self.load_data(
            &document,
            SourceLocator::File(path.to_path_buf()),
            session_factory,
        )
    }
}

// ---------------------------------------------------------------------------
// PolicyCollection
// ---------------------------------------------------------------------------

/// The loader's output: zero or more bound, not-yet-validated policies.
pub struct PolicyCollection {
    policies: Vec<LoadedPolicy>,
}

impl std::fmt::Debug for PolicyCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyCollection")
            .field(
                "policies",
                &self.policies.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PolicyCollection {
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedPolicy> {
        self.policies.iter()
    }
}

impl IntoIterator for PolicyCollection {
    type Item = LoadedPolicy;
    type IntoIter = std::vec::IntoIter<LoadedPolicy>;

    fn into_iter(self) -> Self::IntoIter {
        self.policies.into_iter()
    }
}
