//! Fragment link records.
//!
//! A fragment link is recorded when a main application is shared into a
//! child organization. It ties the fragment (the shared copy living in the
//! child organization) back to the main application and its owner.

use serde::{Deserialize, Serialize};

/// Relation between a fragment application and its main application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentLink {
    /// Organization the main application was shared into.
    pub shared_organization_id: String,

    /// Resource id of the fragment inside the shared organization.
    pub fragment_application_id: String,

    /// Organization owning the main application.
    pub owner_organization_id: String,

    /// Resource id of the main application.
    pub main_application_id: String,
}

impl FragmentLink {
    pub fn new(
        shared_organization_id: impl Into<String>,
        fragment_application_id: impl Into<String>,
        owner_organization_id: impl Into<String>,
        main_application_id: impl Into<String>,
    ) -> Self {
        Self {
            shared_organization_id: shared_organization_id.into(),
            fragment_application_id: fragment_application_id.into(),
            owner_organization_id: owner_organization_id.into(),
            main_application_id: main_application_id.into(),
        }
    }

    /// Returns the main-application side of the link.
    #[must_use]
    pub fn main_application(&self) -> MainApplication {
        MainApplication {
            organization_id: self.owner_organization_id.clone(),
            main_application_id: self.main_application_id.clone(),
        }
    }
}

/// Main application resolved for a fragment: its owner organization and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainApplication {
    pub organization_id: String,
    pub main_application_id: String,
}
