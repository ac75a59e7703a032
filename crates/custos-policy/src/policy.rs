use std::sync::Arc;

use custos_core::{PermissionSet, ResourceProvider, ResourceSet, SessionFactory};
use tracing::{debug, warn};

use crate::config::{ActionConfig, ModeConfig, PolicyConfig, RuntimeConfig, MODE_KINDS};
use crate::error::{PolicyError, PolicyResult};
use crate::filters::Filter;
use crate::provider::ProviderRegistry;

// ---------------------------------------------------------------------------
// PolicyContext — identity and collaborators a policy is bound to
// ---------------------------------------------------------------------------

/// Everything a policy (or a filter validating inside it) needs from its
/// surroundings: the owning policy's name, the shared session factory, the
/// provider registry, and engine runtime options.
///
/// Passed explicitly into filter validation so derived configuration (the
/// embedded-policy fragment) is never mutated in the caller's hands.
#[derive(Clone)]
pub struct PolicyContext {
    pub policy_name: String,
    pub session_factory: Arc<dyn SessionFactory>,
    pub registry: Arc<ProviderRegistry>,
    pub runtime: RuntimeConfig,
}

// ---------------------------------------------------------------------------
// LoadedPolicy — bound but not yet validated
// ---------------------------------------------------------------------------

/// Output of the loader: configuration bound to a provider and context,
/// awaiting validation. `validate` consumes it and returns the immutable
/// `Policy`; callers thread the validated value forward.
pub struct LoadedPolicy {
    pub(crate) config: PolicyConfig,
    pub(crate) provider: Arc<dyn ResourceProvider>,
    pub(crate) ctx: PolicyContext,
}

impl LoadedPolicy {
    pub fn name(&self) -> &str {
        &self.ctx.policy_name
    }

    pub fn resource_type(&self) -> &str {
        &self.config.resource
    }

    /// Validate the mode and every filter configuration, producing a
    /// runnable `Policy`. Filter validation failures propagate unchanged,
    /// so the root cause of a nested failure stays visible.
    pub fn validate(self) -> PolicyResult<Policy> {
        if let Some(mode) = &self.config.mode {
            validate_mode(mode, &self.ctx.policy_name)?;
        }

        let mut filters = Vec::with_capacity(self.config.filters.len());
        for filter_config in self.config.filters {
            let filter = filter_config.validate(&self.ctx)?;
            debug!(policy = %self.ctx.policy_name, filter = filter.kind(), "validated filter");
            filters.push(filter);
        }

        Ok(Policy {
            name: self.ctx.policy_name,
            resource_type: self.config.resource,
            mode: self.config.mode,
            actions: self.config.actions,
            provider: self.provider,
            filters,
            session_factory: self.ctx.session_factory,
        })
    }
}

fn validate_mode(mode: &ModeConfig, policy_name: &str) -> PolicyResult<()> {
    if !MODE_KINDS.contains(&mode.kind.as_str()) {
        return Err(PolicyError::Validation(format!(
            "policy '{}': unknown mode type '{}'",
            policy_name, mode.kind
        )));
    }
    if mode.kind == "periodic" && mode.schedule.is_none() {
        return Err(PolicyError::Validation(format!(
            "policy '{}': periodic mode requires a schedule",
            policy_name
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Policy — validated, immutable, runnable
// ---------------------------------------------------------------------------

/// A validated policy. Read-only after construction: safe to share across
/// evaluation cycles, holds no caches, re-polls on every call.
pub struct Policy {
    name: String,
    resource_type: String,
    mode: Option<ModeConfig>,
    actions: Vec<ActionConfig>,
    provider: Arc<dyn ResourceProvider>,
    filters: Vec<Filter>,
    session_factory: Arc<dyn SessionFactory>,
}

impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("resource_type", &self.resource_type)
            .field("mode", &self.mode)
            .field("actions", &self.actions)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

impl Policy {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn mode(&self) -> Option<&ModeConfig> {
        self.mode.as_ref()
    }

    pub fn actions(&self) -> &[ActionConfig] {
        &self.actions
    }

    /// Whether the policy can be evaluated in the current environment:
    /// a session is obtainable and the provider serves this resource type
    /// there. Session failure is treated conservatively as not runnable.
    pub fn is_runnable(&self) -> bool {
        match self.session_factory.session() {
            Ok(session) => self.provider.is_available(session.as_ref()),
            Err(e) => {
                warn!(policy = %self.name, error = %e, "session unavailable, policy not runnable");
                false
            }
        }
    }

    /// Enumerate live resources and narrow them through this policy's
    /// filters, in order. Blocking; performs real provider I/O on every
    /// call, with no caching across invocations.
    pub fn poll(&self) -> PolicyResult<ResourceSet> {
        let session = self.session_factory.session()?;
        let mut resources = self.provider.enumerate(session.as_ref())?;
        for filter in &self.filters {
            resources = filter.process(resources, None)?;
        }
        Ok(resources)
    }

    /// The union of permissions needed to poll this resource type and
    /// evaluate this policy's filters.
    pub fn permissions(&self) -> PermissionSet {
        let mut permissions = self.provider.permissions();
        for filter in &self.filters {
            permissions.extend(filter.permissions());
        }
        permissions
    }
}
