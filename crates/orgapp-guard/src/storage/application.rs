//! Application store trait.

use async_trait::async_trait;

use crate::AppMgtResult;
use crate::types::Application;

/// Read access to persisted applications.
///
/// # Example
///
/// ```ignore
/// use orgapp_guard::storage::ApplicationStore;
///
/// async fn example(store: &impl ApplicationStore) -> orgapp_guard::AppMgtResult<()> {
///     if let Some(app) = store.get_by_name("pickup", "root.example").await? {
///         println!("Found application: {}", app.resource_id);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Find an application by its resource id within a tenant.
    ///
    /// Returns `None` if no such application exists in the tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_by_resource_id(
        &self,
        resource_id: &str,
        tenant_domain: &str,
    ) -> AppMgtResult<Option<Application>>;

    /// Find an application by its name within a tenant.
    ///
    /// Returns `None` if no such application exists in the tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_by_name(
        &self,
        name: &str,
        tenant_domain: &str,
    ) -> AppMgtResult<Option<Application>>;
}
