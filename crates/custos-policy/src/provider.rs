use std::collections::HashMap;
use std::sync::Arc;

use custos_core::{
    CoreError, CoreResult, PermissionSet, Resource, ResourceProvider, Session, SessionFactory,
};

// ---------------------------------------------------------------------------
// ProviderRegistry — resource-type id → provider
// ---------------------------------------------------------------------------

/// Registry mapping resource-type identifiers to their providers. Built
/// once at startup; read-only afterwards.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ResourceProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn ResourceProvider>) {
        self.providers
            .insert(provider.resource_type().to_string(), provider);
    }

    pub fn get(&self, resource_type: &str) -> Option<Arc<dyn ResourceProvider>> {
        self.providers.get(resource_type).cloned()
    }

    /// Registered resource-type identifiers, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.providers.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// StaticProvider — in-memory provider for fixture runs and testing
// ---------------------------------------------------------------------------

/// A provider backed by a fixed resource list. Used by the CLI's fixture
/// wiring and throughout the test suites.
pub struct StaticProvider {
    resource_type: String,
    permissions: PermissionSet,
    available: bool,
    resources: Vec<Resource>,
}

impl StaticProvider {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            permissions: PermissionSet::new(),
            available: true,
            resources: Vec::new(),
        }
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// Mark the resource type as unavailable in every session environment.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl ResourceProvider for StaticProvider {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn permissions(&self) -> PermissionSet {
        self.permissions.clone()
    }

    fn is_available(&self, _session: &dyn Session) -> bool {
        self.available
    }

    fn enumerate(&self, _session: &dyn Session) -> CoreResult<Vec<Resource>> {
        Ok(self.resources.clone())
    }
}

// ---------------------------------------------------------------------------
// StaticSessionFactory — fixed account/region sessions
// ---------------------------------------------------------------------------

pub struct StaticSession {
    account_id: String,
    region: String,
}

impl Session for StaticSession {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn region(&self) -> &str {
        &self.region
    }
}

/// Session factory that always yields the same account/region scope.
pub struct StaticSessionFactory {
    account_id: String,
    region: String,
}

impl StaticSessionFactory {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }
}

impl SessionFactory for StaticSessionFactory {
    fn session(&self) -> CoreResult<Box<dyn Session>> {
        Ok(Box::new(StaticSession {
            account_id: self.account_id.clone(),
            region: self.region.clone(),
        }))
    }
}

/// Session factory that always fails, for exercising the conservative
/// not-runnable path.
pub struct FailingSessionFactory;

impl SessionFactory for FailingSessionFactory {
    fn session(&self) -> CoreResult<Box<dyn Session>> {
        Err(CoreError::Session("no credentials available".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StaticProvider::new("ec2")));
        registry.register(Arc::new(StaticProvider::new("account")));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("ec2").is_some());
        assert!(registry.get("rds").is_none());
        assert_eq!(registry.types(), vec!["account", "ec2"]);
    }

    #[test]
    fn test_static_provider_enumerate() {
        let provider = StaticProvider::new("ec2")
            .with_permissions(["ec2:DescribeInstances"])
            .with_resources(vec![Resource::new("i-1"), Resource::new("i-2")]);
        let factory = StaticSessionFactory::new("123456789012", "us-east-1");
        let session = factory.session().unwrap();

        assert!(provider.is_available(session.as_ref()));
        let resources = provider.enumerate(session.as_ref()).unwrap();
        assert_eq!(resources.len(), 2);
        assert!(provider.permissions().contains("ec2:DescribeInstances"));
    }

    #[test]
    fn test_static_provider_unavailable() {
        let provider = StaticProvider::new("ec2").unavailable();
        let factory = StaticSessionFactory::new("123456789012", "us-east-1");
        let session = factory.session().unwrap();
        assert!(!provider.is_available(session.as_ref()));
    }

    #[test]
    fn test_failing_session_factory() {
        let factory = FailingSessionFactory;
        assert!(factory.session().is_err());
    }
}
