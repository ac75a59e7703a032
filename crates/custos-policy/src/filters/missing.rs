//! Absence assertion: the `missing` filter embeds a restricted policy
//! inside its parent and polls it inline. Zero matches confirm absence and
//! let the parent's resources through; any match, or an environment where
//! the embedded policy cannot run, suppresses them all.

use custos_core::{Event, PermissionSet, ResourceSet};
use tracing::{debug, warn};

use crate::config::{FilterConfig, MissingConfig, PolicyConfig, PolicyDocument};
use crate::error::{PolicyError, PolicyResult};
use crate::loader::{PolicyLoader, SourceLocator};
use crate::policy::{Policy, PolicyContext};

/// Build the embedded policy from the parent filter's `policy` fragment.
///
/// The fragment is cloned and the parent's name injected over any
/// caller-supplied one, so the embedded policy is traceable to its parent
/// and can never collide with an independently loaded policy. The parent's
/// session factory passes through unchanged. All constraint checks run
/// before the loader is invoked; malformed configuration never reaches
/// provider code.
pub fn build_embedded_policy(
    fragment: &PolicyConfig,
    parent: &PolicyContext,
) -> PolicyResult<Policy> {
    if fragment.mode.is_some() {
        return Err(PolicyError::Validation(format!(
            "policy '{}': execution mode cannot be set on an embedded policy",
            parent.policy_name
        )));
    }
    if !fragment.actions.is_empty() {
        return Err(PolicyError::Validation(format!(
            "policy '{}': actions cannot be set on an embedded policy",
            parent.policy_name
        )));
    }
    // Embedding is exactly one level deep.
    if fragment
        .filters
        .iter()
        .any(|f| matches!(f, FilterConfig::Missing(_)))
    {
        return Err(PolicyError::Validation(format!(
            "policy '{}': an embedded policy cannot itself embed a policy",
            parent.policy_name
        )));
    }

    let mut config = fragment.clone();
    config.name = Some(parent.policy_name.clone());

    let loader = PolicyLoader::new(parent.registry.clone(), parent.runtime.clone());
    let document = PolicyDocument {
        policies: vec![config],
    };
    let collection = loader.load_data(
        &document,
        SourceLocator::Memory,
        parent.session_factory.clone(),
    )?;

    match collection.into_iter().next() {
        Some(loaded) => loaded.validate(),
        None => Err(PolicyError::Validation(format!(
            "policy '{}': embedded policy configuration yielded no loadable policy",
            parent.policy_name
        ))),
    }
}

/// The validated absence filter. Owns the embedded policy, built once at
/// validation time and reused for the lifetime of the filter.
#[derive(Debug)]
pub struct MissingFilter {
    embedded: Policy,
}

impl MissingFilter {
    pub fn validate(config: MissingConfig, ctx: &PolicyContext) -> PolicyResult<Self> {
        let embedded = build_embedded_policy(&config.policy, ctx)?;
        Ok(Self { embedded })
    }

    pub fn embedded(&self) -> &Policy {
        &self.embedded
    }

    /// Exactly the embedded policy's footprint; the filter itself adds no
    /// permissions.
    pub fn permissions(&self) -> PermissionSet {
        self.embedded.permissions()
    }

    /// The absence-assertion algorithm. Polls the embedded policy on every
    /// call; no result caching. `event` is accepted for interface symmetry
    /// and unused: absence is always asserted by an active point-in-time
    /// poll, never derived from the triggering event.
    pub fn process(
        &self,
        resources: ResourceSet,
        _event: Option<&Event>,
    ) -> PolicyResult<ResourceSet> {
        if !self.embedded.is_runnable() {
            warn!(
                policy = %self.embedded.name(),
                resource = %self.embedded.resource_type(),
                "embedded policy not runnable, cannot assert absence"
            );
            return Ok(Vec::new());
        }

        let matched = self.embedded.poll()?;
        if !matched.is_empty() {
            debug!(
                policy = %self.embedded.name(),
                resource = %self.embedded.resource_type(),
                matched = matched.len(),
                "absence assertion failed"
            );
            return Ok(Vec::new());
        }
        Ok(resources)
    }
}
