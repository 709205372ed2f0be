//! Application (service provider) record.
//!
//! The guarded configuration sections of an [`Application`] are held behind
//! `Arc` so that an update can be checked for whether the caller handed back
//! the exact instances it read. Cloning an application shares those
//! instances; deserializing or rebuilding a section creates a new one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::claims::ClaimConfig;
use super::property::{ApplicationProperty, PropertyBag};

/// An application registered in a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Opaque, tenant-independent resource identifier.
    pub resource_id: String,

    /// Application name, unique within its tenant.
    pub name: String,

    /// Tenant domain the application belongs to.
    pub tenant_domain: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form properties, including the fragment marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Arc<PropertyBag>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_auth_config: Option<Arc<InboundAuthenticationConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_and_role_config: Option<Arc<PermissionAndRoleConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_config: Option<Arc<ClaimConfig>>,
}

impl Application {
    /// Creates an application with a freshly generated resource id.
    pub fn new(name: impl Into<String>, tenant_domain: impl Into<String>) -> Self {
        Self {
            resource_id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            tenant_domain: tenant_domain.into(),
            description: None,
            properties: None,
            inbound_auth_config: None,
            permission_and_role_config: None,
            claim_config: None,
        }
    }

    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: PropertyBag) -> Self {
        self.properties = Some(Arc::new(properties));
        self
    }

    #[must_use]
    pub fn with_inbound_auth_config(mut self, config: InboundAuthenticationConfig) -> Self {
        self.inbound_auth_config = Some(Arc::new(config));
        self
    }

    #[must_use]
    pub fn with_permission_and_role_config(mut self, config: PermissionAndRoleConfig) -> Self {
        self.permission_and_role_config = Some(Arc::new(config));
        self
    }

    #[must_use]
    pub fn with_claim_config(mut self, config: ClaimConfig) -> Self {
        self.claim_config = Some(Arc::new(config));
        self
    }

    /// Returns `true` if the property bag marks this application as a fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.properties.as_deref().is_some_and(PropertyBag::is_fragment)
    }

    /// Looks up a property by name, ignoring case.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ApplicationProperty> {
        self.properties.as_deref().and_then(|bag| bag.get(name))
    }
}

/// Inbound protocol configuration (OAuth2/OIDC, SAML, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InboundAuthenticationConfig {
    pub inbound_auth_requests: Vec<InboundAuthRequestConfig>,
}

/// A single inbound protocol registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundAuthRequestConfig {
    /// Protocol-specific key, e.g. the OAuth client id or SAML issuer.
    pub inbound_auth_key: String,

    /// Protocol type, e.g. `oauth2` or `samlsso`.
    pub inbound_auth_type: String,

    #[serde(default)]
    pub properties: Vec<ApplicationProperty>,
}

impl InboundAuthRequestConfig {
    pub fn new(inbound_auth_key: impl Into<String>, inbound_auth_type: impl Into<String>) -> Self {
        Self {
            inbound_auth_key: inbound_auth_key.into(),
            inbound_auth_type: inbound_auth_type.into(),
            properties: Vec::new(),
        }
    }
}

/// Permission and role configuration of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionAndRoleConfig {
    pub permissions: Vec<String>,

    pub role_mappings: Vec<RoleMapping>,

    /// Roles asserted by identity providers for this application.
    pub idp_roles: Vec<String>,
}

/// Mapping from a local role to the role name the application sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMapping {
    pub local_role: String,
    pub remote_role: String,
}

/// Returns `true` if both sides hold the same instance, or both are absent.
///
/// Content is not compared: two equal values behind different `Arc`s are
/// different instances.
#[must_use]
pub fn same_instance<T>(left: &Option<Arc<T>>, right: &Option<Arc<T>>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => Arc::ptr_eq(l, r),
        (None, None) => true,
        _ => false,
    }
}
