//! Filter layer: unvalidated `FilterConfig` values become validated
//! `Filter` values during policy validation, and validated filters narrow
//! resource sets during evaluation.

pub mod missing;
pub mod value;

pub use missing::MissingFilter;
pub use value::ValueFilter;

use custos_core::{Event, PermissionSet, ResourceSet};

use crate::config::FilterConfig;
use crate::error::PolicyResult;
use crate::policy::PolicyContext;

impl FilterConfig {
    /// Validate this configuration in the context of its owning policy,
    /// producing the runnable filter. Consumes the config; the validated
    /// value is threaded forward by the caller.
    pub fn validate(self, ctx: &PolicyContext) -> PolicyResult<Filter> {
        match self {
            FilterConfig::Missing(config) => {
                Ok(Filter::Missing(MissingFilter::validate(config, ctx)?))
            }
            FilterConfig::Value(config) => Ok(Filter::Value(ValueFilter::validate(config)?)),
        }
    }
}

/// A validated filter. Immutable after validation; `process` takes the
/// incoming resource set by value and returns the narrowed set.
pub enum Filter {
    Missing(MissingFilter),
    Value(ValueFilter),
}

impl Filter {
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Missing(_) => "missing",
            Filter::Value(_) => "value",
        }
    }

    /// Permissions this filter needs beyond the owning policy's own.
    pub fn permissions(&self) -> PermissionSet {
        match self {
            Filter::Missing(f) => f.permissions(),
            Filter::Value(f) => f.permissions(),
        }
    }

    pub fn process(
        &self,
        resources: ResourceSet,
        event: Option<&Event>,
    ) -> PolicyResult<ResourceSet> {
        match self {
            Filter::Missing(f) => f.process(resources, event),
            Filter::Value(f) => f.process(resources, event),
        }
    }
}
