//! Custos Root Library
//!
//! Core library for the Custos policy engine root binary. Provides
//! configuration, error handling, fixture-backed provider wiring, and the
//! orchestration layer that loads, validates, and runs policy documents.
//!
//! # Architecture
//!
//! The root binary is a thin orchestrator. It builds a provider registry
//! from a fixture document, hands it to the policy loader together with a
//! session factory, validates every loaded policy, and either reports the
//! aggregated permission footprint or polls each policy and prints the
//! matched resources.

pub mod config;
pub mod error;
pub mod fixtures;

pub use config::RootConfig;
pub use error::{RootError, RootResult};
pub use fixtures::{load_fixtures, registry_from_fixtures, FixtureDocument};

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use custos_core::{PermissionSet, ResourceSet, SessionFactory};
use custos_policy::{
    Policy, PolicyLoader, ProviderRegistry, RuntimeConfig, StaticSessionFactory,
};

/// Session factory for fixture runs: a fixed scope derived from the
/// runtime configuration, defaulting to a placeholder account.
pub fn session_factory_for(runtime: &RuntimeConfig) -> Arc<dyn SessionFactory> {
    Arc::new(StaticSessionFactory::new(
        runtime.account_id.as_deref().unwrap_or("000000000000"),
        runtime.region.as_deref().unwrap_or("global"),
    ))
}

/// Load a policy document from disk and validate every policy in it.
pub fn load_and_validate(
    path: &Path,
    registry: Arc<ProviderRegistry>,
    runtime: RuntimeConfig,
    session_factory: Arc<dyn SessionFactory>,
) -> RootResult<Vec<Policy>> {
    let loader = PolicyLoader::new(registry, runtime);
    let collection = loader.load_file(path, session_factory)?;

    let mut policies = Vec::with_capacity(collection.len());
    for loaded in collection {
        let policy = loaded.validate()?;
        info!(policy = %policy.name(), resource = %policy.resource_type(), "validated");
        if !policy.actions().is_empty() {
            warn!(policy = %policy.name(), "policy declares actions; this tool does not execute them");
        }
        policies.push(policy);
    }
    Ok(policies)
}

/// Outcome of polling one policy.
#[derive(Debug, Serialize)]
pub struct PolicyRun {
    pub policy: String,
    pub resource_type: String,
    pub matched: ResourceSet,
}

/// Poll every policy and collect the matched resources. Policies that are
/// not runnable in the current environment are skipped with a warning.
pub fn run_policies(policies: &[Policy]) -> RootResult<Vec<PolicyRun>> {
    let mut runs = Vec::with_capacity(policies.len());
    for policy in policies {
        if !policy.is_runnable() {
            warn!(policy = %policy.name(), "not runnable in this environment, skipping");
            runs.push(PolicyRun {
                policy: policy.name().to_string(),
                resource_type: policy.resource_type().to_string(),
                matched: Vec::new(),
            });
            continue;
        }
        let matched = policy.poll()?;
        info!(policy = %policy.name(), matched = matched.len(), "polled");
        runs.push(PolicyRun {
            policy: policy.name().to_string(),
            resource_type: policy.resource_type().to_string(),
            matched,
        });
    }
    Ok(runs)
}

/// Aggregate the permission footprint of a set of validated policies.
pub fn aggregate_permissions(policies: &[Policy]) -> PermissionSet {
    let mut permissions = PermissionSet::new();
    for policy in policies {
        permissions.extend(policy.permissions());
    }
    permissions
}
