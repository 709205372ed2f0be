//! Application lifecycle listeners.
//!
//! The host pipeline calls every enabled [`ApplicationMgtListener`] at the
//! matching lifecycle point, lowest execution order first. A gate hook
//! returning `false` vetoes the operation; the host must not touch the
//! persisted application in that case.
//!
//! [`DefaultApplicationListener`] is the no-op policy the host falls back to
//! when no listener overrides a hook. [`FragmentApplicationGuard`] delegates
//! to it once its own checks pass.

pub mod fragment;

use async_trait::async_trait;

use crate::AppMgtResult;
use crate::types::Application;

pub use fragment::FragmentApplicationGuard;

/// Hooks invoked by the application-management pipeline.
#[async_trait]
pub trait ApplicationMgtListener: Send + Sync {
    /// Listener name as used in its `[[event_listener]]` declaration.
    fn name(&self) -> &str;

    /// Whether the host should invoke this listener at all.
    fn is_enable(&self) -> bool;

    /// Default execution order; lower runs first.
    fn priority(&self) -> i32;

    /// Effective execution order after configuration overrides.
    fn execution_order_id(&self) -> i32;

    /// Called before an application update is persisted.
    ///
    /// Returns `Ok(false)` to veto the update.
    async fn before_update(
        &self,
        application: &Application,
        tenant_domain: &str,
        actor: &str,
    ) -> AppMgtResult<bool>;

    /// Called after an application is read; may rewrite the returned record.
    async fn after_get_application(
        &self,
        application: Application,
        application_name: &str,
        tenant_domain: &str,
    ) -> AppMgtResult<Application>;

    /// Called before an application is deleted.
    ///
    /// Returns `Ok(false)` to veto the deletion.
    async fn before_delete(
        &self,
        application_name: &str,
        tenant_domain: &str,
        actor: &str,
    ) -> AppMgtResult<bool>;
}

/// Allow-everything listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultApplicationListener;

#[async_trait]
impl ApplicationMgtListener for DefaultApplicationListener {
    fn name(&self) -> &str {
        "DefaultApplicationListener"
    }

    fn is_enable(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        0
    }

    fn execution_order_id(&self) -> i32 {
        self.priority()
    }

    async fn before_update(
        &self,
        _application: &Application,
        _tenant_domain: &str,
        _actor: &str,
    ) -> AppMgtResult<bool> {
        Ok(true)
    }

    async fn after_get_application(
        &self,
        application: Application,
        _application_name: &str,
        _tenant_domain: &str,
    ) -> AppMgtResult<Application> {
        Ok(application)
    }

    async fn before_delete(
        &self,
        _application_name: &str,
        _tenant_domain: &str,
        _actor: &str,
    ) -> AppMgtResult<bool> {
        Ok(true)
    }
}
