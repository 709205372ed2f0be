//! Fragment link store trait.

use async_trait::async_trait;

use crate::OrgMgtResult;
use crate::types::MainApplication;

/// Read access to fragment links.
#[async_trait]
pub trait FragmentLinkStore: Send + Sync {
    /// Find the main application a fragment was shared from.
    ///
    /// # Arguments
    ///
    /// * `fragment_application_id` - Resource id of the fragment
    /// * `shared_organization_id` - Organization the fragment lives in
    ///
    /// Returns `None` if no link is recorded for the pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_main_application(
        &self,
        fragment_application_id: &str,
        shared_organization_id: &str,
    ) -> OrgMgtResult<Option<MainApplication>>;

    /// Returns `true` if at least one fragment links to the main application.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn has_fragments(&self, main_application_id: &str) -> OrgMgtResult<bool>;
}
