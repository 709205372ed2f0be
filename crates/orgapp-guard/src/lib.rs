//! # orgapp-guard
//!
//! Lifecycle guard for applications shared across organizations.
//!
//! When a main application is shared into a child organization, a lightweight
//! fragment copy is provisioned there. This crate provides the listener that
//! keeps main applications and their fragments consistent:
//!
//! - fragments may not have their protocol, permission or property
//!   configuration replaced
//! - fragments always read the claim configuration of their main application
//! - fragments cannot be deleted, and main applications cannot be deleted
//!   while fragments exist
//!
//! ## Modules
//!
//! - [`types`] - Applications, configuration sections and fragment links
//! - [`storage`] - Collaborator traits (application store, organization
//!   resolver, fragment links)
//! - [`listener`] - The listener capability trait, the default listener and
//!   [`FragmentApplicationGuard`]
//! - [`config`] - Event-listener declarations and hot reload
//! - [`error`] - Application- and organization-management errors

pub mod config;
pub mod error;
pub mod listener;
pub mod storage;
pub mod types;

pub use config::{
    APPLICATION_MGT_LISTENER, ConfigError, EventListenerConfig, ListenerConfigProvider,
    ListenerConfigs, ReloadableListenerConfigs,
};
pub use error::{AppMgtError, ErrorCategory, OrgErrorCode, OrgMgtError};
pub use listener::fragment::{DEFAULT_ORDER_ID, FRAGMENT_APPLICATION_GUARD};
pub use listener::{ApplicationMgtListener, DefaultApplicationListener, FragmentApplicationGuard};
pub use storage::{ApplicationStore, FragmentLinkStore, OrganizationResolver};
pub use types::{Application, ClaimConfig, FragmentLink, IS_FRAGMENT_APP, MainApplication, PropertyBag};

/// Result type for application-management operations.
pub type AppMgtResult<T> = Result<T, AppMgtError>;

/// Result type for organization-management operations.
pub type OrgMgtResult<T> = Result<T, OrgMgtError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use orgapp_guard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ListenerConfigProvider, ListenerConfigs, ReloadableListenerConfigs};
    pub use crate::error::{AppMgtError, OrgErrorCode, OrgMgtError};
    pub use crate::listener::{
        ApplicationMgtListener, DefaultApplicationListener, FragmentApplicationGuard,
    };
    pub use crate::storage::{ApplicationStore, FragmentLinkStore, OrganizationResolver};
    pub use crate::types::{Application, FragmentLink, MainApplication, PropertyBag};
    pub use crate::{AppMgtResult, OrgMgtResult};
}
