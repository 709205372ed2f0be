//! Guard for shared (main) and fragment applications.
//!
//! Rules enforced by [`FragmentApplicationGuard`]:
//!
//! - A fragment may only be updated if the caller hands back the very same
//!   inbound-authentication, permission/role and property instances that are
//!   persisted. Instances are compared, not contents.
//! - A fragment read inherits the claim configuration of its main application.
//! - A fragment can never be deleted, and neither can a main application
//!   that still has fragments. Deleting an unknown application is vetoed.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use orgapp_guard::{FragmentApplicationGuard, ApplicationMgtListener};
//!
//! let guard = FragmentApplicationGuard::new(apps, organizations, links, listener_configs);
//! if guard.is_enable() && !guard.before_delete("pickup", "root.example", "admin").await? {
//!     // the host must not delete the application
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{APPLICATION_MGT_LISTENER, EventListenerConfig, ListenerConfigProvider};
use crate::error::{AppMgtError, OrgErrorCode, handle_client_error, handle_server_error};
use crate::listener::{ApplicationMgtListener, DefaultApplicationListener};
use crate::storage::{ApplicationStore, FragmentLinkStore, OrganizationResolver};
use crate::types::{Application, MainApplication, same_instance};
use crate::{AppMgtResult, OrgMgtResult};

/// Name under which the guard is declared in listener configuration.
pub const FRAGMENT_APPLICATION_GUARD: &str = "FragmentApplicationGuard";

/// Default execution order of the guard.
pub const DEFAULT_ORDER_ID: i32 = 50;

const MAIN_APPLICATION_LOOKUP_FAILED: &str =
    "Error when retrieving the main app id using shared app id.";
const DELETE_VALIDATION_FAILED: &str = "Error in validating the application for deletion.";

/// Lifecycle listener restricting changes to shared and fragment applications.
///
/// Holds no mutable state; all decisions are made over snapshots fetched from
/// the injected collaborators.
pub struct FragmentApplicationGuard {
    applications: Arc<dyn ApplicationStore>,
    organizations: Arc<dyn OrganizationResolver>,
    fragment_links: Arc<dyn FragmentLinkStore>,
    listener_configs: Arc<dyn ListenerConfigProvider>,
    fallback: Arc<dyn ApplicationMgtListener>,
}

impl FragmentApplicationGuard {
    /// Creates a guard that falls back to [`DefaultApplicationListener`].
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        organizations: Arc<dyn OrganizationResolver>,
        fragment_links: Arc<dyn FragmentLinkStore>,
        listener_configs: Arc<dyn ListenerConfigProvider>,
    ) -> Self {
        Self {
            applications,
            organizations,
            fragment_links,
            listener_configs,
            fallback: Arc::new(DefaultApplicationListener),
        }
    }

    /// Replaces the listener consulted once the guard's own checks pass.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn ApplicationMgtListener>) -> Self {
        self.fallback = fallback;
        self
    }

    fn listener_config(&self) -> Option<EventListenerConfig> {
        self.listener_configs
            .listener_config(APPLICATION_MGT_LISTENER, FRAGMENT_APPLICATION_GUARD)
    }

    /// Resolves the main application a fragment was shared from.
    ///
    /// Returns `None` if no fragment link is recorded for the fragment.
    async fn main_application_of(
        &self,
        fragment: &Application,
        tenant_domain: &str,
    ) -> OrgMgtResult<Option<Application>> {
        let shared_org_id = self
            .organizations
            .resolve_organization_id(tenant_domain)
            .await?;

        let Some(link) = self
            .fragment_links
            .get_main_application(&fragment.resource_id, &shared_org_id)
            .await?
        else {
            return Ok(None);
        };

        self.fetch_main_application(&link, &fragment.resource_id, &shared_org_id)
            .await
            .map(Some)
    }

    async fn fetch_main_application(
        &self,
        link: &MainApplication,
        fragment_id: &str,
        shared_org_id: &str,
    ) -> OrgMgtResult<Application> {
        let resolution_failed = |source: crate::error::BoxError| {
            handle_server_error(
                OrgErrorCode::ErrorResolvingMainApplication,
                source,
                &[fragment_id, shared_org_id],
            )
        };

        let main_tenant_domain = self
            .organizations
            .resolve_tenant_domain(&link.organization_id)
            .await
            .map_err(|e| resolution_failed(e.into()))?;

        self.applications
            .get_by_resource_id(&link.main_application_id, &main_tenant_domain)
            .await
            .map_err(|e| resolution_failed(e.into()))?
            .ok_or_else(|| {
                handle_client_error(
                    OrgErrorCode::InvalidApplication,
                    &[link.main_application_id.as_str()],
                )
            })
    }
}

/// Returns `true` if the guarded sections of `updated` are the persisted instances.
fn has_only_allowed_changes(existing: &Application, updated: &Application) -> bool {
    same_instance(&existing.inbound_auth_config, &updated.inbound_auth_config)
        && same_instance(
            &existing.permission_and_role_config,
            &updated.permission_and_role_config,
        )
        && same_instance(&existing.properties, &updated.properties)
}

#[async_trait]
impl ApplicationMgtListener for FragmentApplicationGuard {
    fn name(&self) -> &str {
        FRAGMENT_APPLICATION_GUARD
    }

    fn is_enable(&self) -> bool {
        self.listener_config()
            .is_some_and(|config| config.is_enabled())
    }

    fn priority(&self) -> i32 {
        DEFAULT_ORDER_ID
    }

    fn execution_order_id(&self) -> i32 {
        self.listener_config()
            .and_then(|config| config.order_id)
            .unwrap_or_else(|| self.priority())
    }

    async fn before_update(
        &self,
        application: &Application,
        tenant_domain: &str,
        actor: &str,
    ) -> AppMgtResult<bool> {
        let existing = self
            .applications
            .get_by_resource_id(&application.resource_id, tenant_domain)
            .await?;

        if let Some(existing) = existing
            && existing.is_fragment()
            && !has_only_allowed_changes(&existing, application)
        {
            tracing::debug!(
                application_id = %application.resource_id,
                tenant_domain = %tenant_domain,
                actor = %actor,
                "Update of fragment application vetoed: guarded configuration replaced"
            );
            return Ok(false);
        }

        self.fallback
            .before_update(application, tenant_domain, actor)
            .await
    }

    async fn after_get_application(
        &self,
        mut application: Application,
        application_name: &str,
        tenant_domain: &str,
    ) -> AppMgtResult<Application> {
        if application.is_fragment() {
            let main = self
                .main_application_of(&application, tenant_domain)
                .await
                .map_err(|e| {
                    let err = AppMgtError::organization(MAIN_APPLICATION_LOOKUP_FAILED, e);
                    tracing::warn!(
                        application_id = %application.resource_id,
                        tenant_domain = %tenant_domain,
                        category = %err.category(),
                        error = ?err.organization_error(),
                        "Failed to resolve main application of fragment"
                    );
                    err
                })?;

            if let Some(main) = main {
                let (requested, mandatory) = main.claim_config.as_deref().map_or((0, 0), |c| {
                    (c.requested_claims().count(), c.mandatory_claims().count())
                });
                tracing::debug!(
                    application_id = %application.resource_id,
                    main_application_id = %main.resource_id,
                    requested_claims = requested,
                    mandatory_claims = mandatory,
                    "Fragment inherits claim configuration of main application"
                );
                application.claim_config = main.claim_config;
            }
        }

        self.fallback
            .after_get_application(application, application_name, tenant_domain)
            .await
    }

    async fn before_delete(
        &self,
        application_name: &str,
        tenant_domain: &str,
        actor: &str,
    ) -> AppMgtResult<bool> {
        let Some(application) = self
            .applications
            .get_by_name(application_name, tenant_domain)
            .await?
        else {
            tracing::debug!(
                application_name = %application_name,
                tenant_domain = %tenant_domain,
                "Delete vetoed: application not found"
            );
            return Ok(false);
        };

        if application.is_fragment() {
            tracing::debug!(
                application_id = %application.resource_id,
                tenant_domain = %tenant_domain,
                actor = %actor,
                "Delete vetoed: fragment applications cannot be deleted"
            );
            return Ok(false);
        }

        let has_fragments = self
            .fragment_links
            .has_fragments(&application.resource_id)
            .await
            .map_err(|e| {
                let err = AppMgtError::organization(DELETE_VALIDATION_FAILED, e);
                tracing::warn!(
                    application_id = %application.resource_id,
                    category = %err.category(),
                    error = ?err.organization_error(),
                    "Failed to check fragments before delete"
                );
                err
            })?;

        if has_fragments {
            tracing::debug!(
                application_id = %application.resource_id,
                tenant_domain = %tenant_domain,
                actor = %actor,
                "Delete vetoed: application still has fragments"
            );
            return Ok(false);
        }

        self.fallback
            .before_delete(application_name, tenant_domain, actor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListenerConfigs;
    use crate::error::OrgMgtError;
    use crate::types::{ClaimConfig, ClaimMapping, IS_FRAGMENT_APP, PropertyBag};
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Mock application store keyed by resource id.
    #[derive(Default)]
    struct MockApplicationStore {
        apps: RwLock<HashMap<String, Application>>,
        fail: AtomicBool,
    }

    impl MockApplicationStore {
        fn add(&self, app: Application) {
            self.apps
                .write()
                .unwrap()
                .insert(app.resource_id.clone(), app);
        }
    }

    #[async_trait]
    impl ApplicationStore for MockApplicationStore {
        async fn get_by_resource_id(
            &self,
            resource_id: &str,
            tenant_domain: &str,
        ) -> AppMgtResult<Option<Application>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppMgtError::store("database down"));
            }
            Ok(self
                .apps
                .read()
                .unwrap()
                .get(resource_id)
                .filter(|a| a.tenant_domain == tenant_domain)
                .cloned())
        }

        async fn get_by_name(
            &self,
            name: &str,
            tenant_domain: &str,
        ) -> AppMgtResult<Option<Application>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppMgtError::store("database down"));
            }
            Ok(self
                .apps
                .read()
                .unwrap()
                .values()
                .find(|a| a.name == name && a.tenant_domain == tenant_domain)
                .cloned())
        }
    }

    /// Organization ids are the tenant domain with an `org-` prefix.
    #[derive(Default)]
    struct MockOrganizations {
        fail: AtomicBool,
    }

    #[async_trait]
    impl OrganizationResolver for MockOrganizations {
        async fn resolve_organization_id(&self, tenant_domain: &str) -> OrgMgtResult<String> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(handle_server_error(
                    OrgErrorCode::ErrorResolvingOrganization,
                    AppMgtError::store("directory down"),
                    &[tenant_domain],
                ));
            }
            Ok(format!("org-{tenant_domain}"))
        }

        async fn resolve_tenant_domain(&self, organization_id: &str) -> OrgMgtResult<String> {
            organization_id
                .strip_prefix("org-")
                .map(str::to_string)
                .ok_or_else(|| {
                    handle_client_error(
                        OrgErrorCode::ErrorResolvingTenantDomain,
                        &[organization_id],
                    )
                })
        }
    }

    #[derive(Default)]
    struct MockLinks {
        links: RwLock<Vec<(String, String, MainApplication)>>,
        fail: AtomicBool,
    }

    impl MockLinks {
        fn link(&self, fragment_id: &str, shared_org: &str, owner_org: &str, main_id: &str) {
            self.links.write().unwrap().push((
                fragment_id.to_string(),
                shared_org.to_string(),
                MainApplication {
                    organization_id: owner_org.to_string(),
                    main_application_id: main_id.to_string(),
                },
            ));
        }
    }

    #[async_trait]
    impl FragmentLinkStore for MockLinks {
        async fn get_main_application(
            &self,
            fragment_application_id: &str,
            shared_organization_id: &str,
        ) -> OrgMgtResult<Option<MainApplication>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(handle_server_error(
                    OrgErrorCode::ErrorRetrievingMainApplication,
                    AppMgtError::store("database down"),
                    &[fragment_application_id, shared_organization_id],
                ));
            }
            Ok(self
                .links
                .read()
                .unwrap()
                .iter()
                .find(|(f, o, _)| f == fragment_application_id && o == shared_organization_id)
                .map(|(_, _, main)| main.clone()))
        }

        async fn has_fragments(&self, main_application_id: &str) -> OrgMgtResult<bool> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(handle_server_error(
                    OrgErrorCode::ErrorCheckingFragments,
                    AppMgtError::store("database down"),
                    &[main_application_id],
                ));
            }
            Ok(self
                .links
                .read()
                .unwrap()
                .iter()
                .any(|(_, _, main)| main.main_application_id == main_application_id))
        }
    }

    /// Listener vetoing every gate.
    struct VetoListener;

    #[async_trait]
    impl ApplicationMgtListener for VetoListener {
        fn name(&self) -> &str {
            "VetoListener"
        }

        fn is_enable(&self) -> bool {
            true
        }

        fn priority(&self) -> i32 {
            10
        }

        fn execution_order_id(&self) -> i32 {
            10
        }

        async fn before_update(&self, _: &Application, _: &str, _: &str) -> AppMgtResult<bool> {
            Ok(false)
        }

        async fn after_get_application(
            &self,
            application: Application,
            _: &str,
            _: &str,
        ) -> AppMgtResult<Application> {
            Ok(application)
        }

        async fn before_delete(&self, _: &str, _: &str, _: &str) -> AppMgtResult<bool> {
            Ok(false)
        }
    }

    struct Fixture {
        apps: Arc<MockApplicationStore>,
        orgs: Arc<MockOrganizations>,
        links: Arc<MockLinks>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                apps: Arc::new(MockApplicationStore::default()),
                orgs: Arc::new(MockOrganizations::default()),
                links: Arc::new(MockLinks::default()),
            }
        }

        fn guard_with(&self, configs: ListenerConfigs) -> FragmentApplicationGuard {
            FragmentApplicationGuard::new(
                self.apps.clone(),
                self.orgs.clone(),
                self.links.clone(),
                Arc::new(configs),
            )
        }

        fn guard(&self) -> FragmentApplicationGuard {
            self.guard_with(ListenerConfigs::new())
        }
    }

    fn fragment(name: &str, tenant: &str) -> Application {
        Application::new(name, tenant)
            .with_properties(PropertyBag::new().with(IS_FRAGMENT_APP, "true"))
    }

    fn guard_config() -> EventListenerConfig {
        EventListenerConfig::new(APPLICATION_MGT_LISTENER, FRAGMENT_APPLICATION_GUARD)
    }

    #[test]
    fn test_is_enable_without_configuration() {
        let fixture = Fixture::new();
        assert!(!fixture.guard().is_enable());
    }

    #[test]
    fn test_is_enable_with_blank_or_false_value() {
        let fixture = Fixture::new();
        let blank = ListenerConfigs::new().with_listener(guard_config().with_enable(" "));
        assert!(!fixture.guard_with(blank).is_enable());

        let unset = ListenerConfigs::new().with_listener(guard_config());
        assert!(!fixture.guard_with(unset).is_enable());

        let off = ListenerConfigs::new().with_listener(guard_config().with_enable("false"));
        assert!(!fixture.guard_with(off).is_enable());
    }

    #[test]
    fn test_is_enable_with_true_value() {
        let fixture = Fixture::new();
        let on = ListenerConfigs::new().with_listener(guard_config().with_enable("True"));
        assert!(fixture.guard_with(on).is_enable());
    }

    #[test]
    fn test_other_listener_declaration_is_ignored() {
        let fixture = Fixture::new();
        let other = ListenerConfigs::new().with_listener(
            EventListenerConfig::new(APPLICATION_MGT_LISTENER, "AuditListener").with_enable("true"),
        );
        assert!(!fixture.guard_with(other).is_enable());
    }

    #[test]
    fn test_priority_and_execution_order() {
        let fixture = Fixture::new();
        let guard = fixture.guard();
        assert_eq!(guard.priority(), 50);
        assert_eq!(guard.execution_order_id(), 50);
        assert_eq!(guard.name(), FRAGMENT_APPLICATION_GUARD);

        let configs = ListenerConfigs::new().with_listener(guard_config().with_order_id(7));
        let guard = fixture.guard_with(configs);
        assert_eq!(guard.priority(), 50);
        assert_eq!(guard.execution_order_id(), 7);
    }

    #[tokio::test]
    async fn test_update_of_unknown_application_allowed() {
        let fixture = Fixture::new();
        let app = fragment("pickup", "o1.example");
        assert!(
            fixture
                .guard()
                .before_update(&app, "o1.example", "admin")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_store_failure_propagates() {
        let fixture = Fixture::new();
        fixture.apps.fail.store(true, Ordering::SeqCst);
        let err = fixture
            .guard()
            .before_update(&Application::new("pickup", "o1.example"), "o1.example", "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppMgtError::Store { .. }));
    }

    #[tokio::test]
    async fn test_update_delegates_to_fallback() {
        let fixture = Fixture::new();
        let app = Application::new("pickup", "root.example");
        fixture.apps.add(app.clone());

        let guard = fixture.guard().with_fallback(Arc::new(VetoListener));
        assert!(!guard.before_update(&app, "root.example", "admin").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_wraps_organization_failure() {
        let fixture = Fixture::new();
        fixture.orgs.fail.store(true, Ordering::SeqCst);

        let err = fixture
            .guard()
            .after_get_application(fragment("pickup", "o1.example"), "pickup", "o1.example")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), MAIN_APPLICATION_LOOKUP_FAILED);
        let org = err.organization_error().unwrap();
        assert_eq!(org.code(), OrgErrorCode::ErrorResolvingOrganization);
    }

    #[tokio::test]
    async fn test_read_wraps_link_lookup_failure() {
        let fixture = Fixture::new();
        fixture.links.fail.store(true, Ordering::SeqCst);

        let err = fixture
            .guard()
            .after_get_application(fragment("pickup", "o1.example"), "pickup", "o1.example")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), MAIN_APPLICATION_LOOKUP_FAILED);
        assert_eq!(err.category(), crate::error::ErrorCategory::Resolution);
        assert_eq!(
            err.organization_error().unwrap().code(),
            OrgErrorCode::ErrorRetrievingMainApplication
        );
    }

    #[tokio::test]
    async fn test_read_main_store_failure_is_server_error() {
        let fixture = Fixture::new();
        let frag = fragment("pickup", "o1.example");
        fixture.links.link(&frag.resource_id, "org-o1.example", "org-root.example", "main-1");
        fixture.apps.fail.store(true, Ordering::SeqCst);

        let err = fixture
            .guard()
            .after_get_application(frag.clone(), "pickup", "o1.example")
            .await
            .unwrap_err();

        let org = err.organization_error().unwrap();
        assert!(matches!(org, OrgMgtError::Server { .. }));
        assert_eq!(org.code(), OrgErrorCode::ErrorResolvingMainApplication);
        assert!(org.description().contains(&frag.resource_id));
        assert!(org.description().contains("org-o1.example"));
    }

    #[tokio::test]
    async fn test_read_unknown_owner_organization_is_server_error() {
        let fixture = Fixture::new();
        let frag = fragment("pickup", "o1.example");
        fixture.links.link(&frag.resource_id, "org-o1.example", "bogus", "main-1");

        let err = fixture
            .guard()
            .after_get_application(frag, "pickup", "o1.example")
            .await
            .unwrap_err();

        assert!(err.is_server_error());
        assert_eq!(
            err.organization_error().unwrap().code(),
            OrgErrorCode::ErrorResolvingMainApplication
        );
    }

    #[tokio::test]
    async fn test_read_inherits_main_claims() {
        let fixture = Fixture::new();
        let main = Application::new("pickup", "root.example").with_claim_config(ClaimConfig {
            claim_mappings: vec![ClaimMapping::requested("http://example.org/claims/email", "email")],
            ..Default::default()
        });
        fixture.apps.add(main.clone());
        let frag = fragment("pickup", "o1.example");
        fixture
            .links
            .link(&frag.resource_id, "org-o1.example", "org-root.example", &main.resource_id);

        let read = fixture
            .guard()
            .after_get_application(frag, "pickup", "o1.example")
            .await
            .unwrap();
        assert!(same_instance(&read.claim_config, &main.claim_config));
    }

    #[tokio::test]
    async fn test_delete_wraps_fragment_check_failure() {
        let fixture = Fixture::new();
        fixture.apps.add(Application::new("pickup", "root.example"));
        fixture.links.fail.store(true, Ordering::SeqCst);

        let err = fixture
            .guard()
            .before_delete("pickup", "root.example", "admin")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), DELETE_VALIDATION_FAILED);
        assert_eq!(
            err.organization_error().unwrap().code(),
            OrgErrorCode::ErrorCheckingFragments
        );
    }

    #[tokio::test]
    async fn test_delete_delegates_to_fallback() {
        let fixture = Fixture::new();
        fixture.apps.add(Application::new("pickup", "root.example"));

        let guard = fixture.guard();
        assert!(guard.before_delete("pickup", "root.example", "admin").await.unwrap());

        let guard = guard.with_fallback(Arc::new(VetoListener));
        assert!(!guard.before_delete("pickup", "root.example", "admin").await.unwrap());
    }
}
