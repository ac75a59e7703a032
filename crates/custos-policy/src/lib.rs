//! Custos Policy Engine
//!
//! Policy model, loader, and filter layer for asserting conditions over
//! live cloud resources. A policy names a resource type, a set of filters,
//! and optionally an execution mode; polling a policy enumerates the
//! resource type through a provider and narrows the result through its
//! filters.
//!
//! Key features:
//! - Two-phase typestate: `LoadedPolicy::validate()` consumes the loaded
//!   policy and returns an immutable, runnable `Policy`
//! - Absence assertion via the `missing` filter: a restricted policy is
//!   embedded inside a parent policy's filter stage and polled inline
//! - Static validation constraints on embedded policies (no `mode`, no
//!   `actions`, no nested embedding)
//! - Permission aggregation across providers and filters
//! - In-memory providers and session factories for offline runs and tests

pub mod config;
pub mod error;
pub mod filters;
pub mod loader;
pub mod policy;
pub mod provider;

// Re-export primary types for convenience
pub use config::{
    ActionConfig, FilterConfig, MissingConfig, ModeConfig, PolicyConfig, PolicyDocument,
    RuntimeConfig, ValueConfig, ValueOp,
};
pub use error::{PolicyError, PolicyResult};
pub use filters::{Filter, MissingFilter, ValueFilter};
pub use loader::{PolicyCollection, PolicyLoader, SourceLocator};
pub use policy::{LoadedPolicy, Policy, PolicyContext};
pub use provider::{
    FailingSessionFactory, ProviderRegistry, StaticProvider, StaticSessionFactory,
};
