//! Core data model: applications, their configuration sections and fragment links.

pub mod application;
pub mod claims;
pub mod fragment;
pub mod property;

pub use application::{
    Application, InboundAuthRequestConfig, InboundAuthenticationConfig, PermissionAndRoleConfig,
    RoleMapping, same_instance,
};
pub use claims::{ClaimConfig, ClaimMapping};
pub use fragment::{FragmentLink, MainApplication};
pub use property::{ApplicationProperty, IS_FRAGMENT_APP, PropertyBag, parse_bool};
