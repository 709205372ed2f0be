use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use orgapp_guard::{AppMgtError, AppMgtResult, Application, ApplicationStore};

/// Application store keyed by resource id.
///
/// Lookups hand out clones, so callers see the stored configuration
/// instances rather than copies of them.
#[derive(Debug, Default)]
pub struct InMemoryApplicationStore {
    apps: DashMap<String, Application>,
    unavailable: AtomicBool,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an application.
    pub fn put(&self, application: Application) {
        self.apps
            .insert(application.resource_id.clone(), application);
    }

    /// Removes an application, returning it if it existed.
    pub fn remove(&self, resource_id: &str) -> Option<Application> {
        self.apps.remove(resource_id).map(|(_, app)| app)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Makes every lookup fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppMgtResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppMgtError::store("in-memory application store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn get_by_resource_id(
        &self,
        resource_id: &str,
        tenant_domain: &str,
    ) -> AppMgtResult<Option<Application>> {
        self.check_available()?;
        Ok(self
            .apps
            .get(resource_id)
            .filter(|app| app.tenant_domain == tenant_domain)
            .map(|app| app.clone()))
    }

    async fn get_by_name(
        &self,
        name: &str,
        tenant_domain: &str,
    ) -> AppMgtResult<Option<Application>> {
        self.check_available()?;
        Ok(self
            .apps
            .iter()
            .find(|entry| entry.name == name && entry.tenant_domain == tenant_domain)
            .map(|entry| entry.value().clone()))
    }
}
