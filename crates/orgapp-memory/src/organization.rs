use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use orgapp_guard::error::{handle_client_error, handle_server_error};
use orgapp_guard::{OrgErrorCode, OrgMgtResult, OrganizationResolver};

/// Bidirectional organization id <-> tenant domain registry.
#[derive(Debug, Default)]
pub struct InMemoryOrganizations {
    by_tenant: DashMap<String, String>,
    by_organization: DashMap<String, String>,
    unavailable: AtomicBool,
}

impl InMemoryOrganizations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an organization and the tenant domain backing it.
    pub fn register(&self, organization_id: impl Into<String>, tenant_domain: impl Into<String>) {
        let organization_id = organization_id.into();
        let tenant_domain = tenant_domain.into();
        self.by_tenant
            .insert(tenant_domain.clone(), organization_id.clone());
        self.by_organization.insert(organization_id, tenant_domain);
    }

    /// Makes every lookup fail with a server error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrganizationResolver for InMemoryOrganizations {
    async fn resolve_organization_id(&self, tenant_domain: &str) -> OrgMgtResult<String> {
        if self.is_unavailable() {
            return Err(handle_server_error(
                OrgErrorCode::ErrorResolvingOrganization,
                "organization registry unavailable",
                &[tenant_domain],
            ));
        }
        self.by_tenant
            .get(tenant_domain)
            .map(|org| org.clone())
            .ok_or_else(|| {
                handle_client_error(OrgErrorCode::ErrorResolvingOrganization, &[tenant_domain])
            })
    }

    async fn resolve_tenant_domain(&self, organization_id: &str) -> OrgMgtResult<String> {
        if self.is_unavailable() {
            return Err(handle_server_error(
                OrgErrorCode::ErrorResolvingTenantDomain,
                "organization registry unavailable",
                &[organization_id],
            ));
        }
        self.by_organization
            .get(organization_id)
            .map(|tenant| tenant.clone())
            .ok_or_else(|| {
                handle_client_error(OrgErrorCode::ErrorResolvingTenantDomain, &[organization_id])
            })
    }
}
