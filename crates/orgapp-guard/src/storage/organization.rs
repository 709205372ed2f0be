//! Organization resolver trait.

use async_trait::async_trait;

use crate::OrgMgtResult;

/// Maps tenant domains to organization ids and back.
///
/// Implementations report unknown inputs as client errors and backend
/// failures as server errors.
#[async_trait]
pub trait OrganizationResolver: Send + Sync {
    /// Resolve the organization id backing a tenant domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant is unknown or the lookup fails.
    async fn resolve_organization_id(&self, tenant_domain: &str) -> OrgMgtResult<String>;

    /// Resolve the tenant domain of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is unknown or the lookup fails.
    async fn resolve_tenant_domain(&self, organization_id: &str) -> OrgMgtResult<String>;
}
