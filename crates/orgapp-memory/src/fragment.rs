use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use orgapp_guard::error::handle_server_error;
use orgapp_guard::{FragmentLink, FragmentLinkStore, MainApplication, OrgErrorCode, OrgMgtResult};

type LinkKey = (String, String); // (fragment_application_id, shared_organization_id)

/// Fragment links keyed by fragment id and shared organization.
#[derive(Debug, Default)]
pub struct InMemoryFragmentLinks {
    links: DashMap<LinkKey, FragmentLink>,
    unavailable: AtomicBool,
}

impl InMemoryFragmentLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link, replacing any link for the same fragment and organization.
    pub fn add(&self, link: FragmentLink) {
        tracing::debug!(
            fragment_application_id = %link.fragment_application_id,
            shared_organization_id = %link.shared_organization_id,
            main_application_id = %link.main_application_id,
            "Fragment link recorded"
        );
        let key = (
            link.fragment_application_id.clone(),
            link.shared_organization_id.clone(),
        );
        self.links.insert(key, link);
    }

    /// Removes the link of a fragment in an organization.
    pub fn remove(
        &self,
        fragment_application_id: &str,
        shared_organization_id: &str,
    ) -> Option<FragmentLink> {
        self.links
            .remove(&(
                fragment_application_id.to_string(),
                shared_organization_id.to_string(),
            ))
            .map(|(_, link)| link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
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
impl FragmentLinkStore for InMemoryFragmentLinks {
    async fn get_main_application(
        &self,
        fragment_application_id: &str,
        shared_organization_id: &str,
    ) -> OrgMgtResult<Option<MainApplication>> {
        if self.is_unavailable() {
            return Err(handle_server_error(
                OrgErrorCode::ErrorRetrievingMainApplication,
                "fragment link store unavailable",
                &[fragment_application_id, shared_organization_id],
            ));
        }
        Ok(self
            .links
            .get(&(
                fragment_application_id.to_string(),
                shared_organization_id.to_string(),
            ))
            .map(|link| link.main_application()))
    }

    async fn has_fragments(&self, main_application_id: &str) -> OrgMgtResult<bool> {
        if self.is_unavailable() {
            return Err(handle_server_error(
                OrgErrorCode::ErrorCheckingFragments,
                "fragment link store unavailable",
                &[main_application_id],
            ));
        }
        Ok(self
            .links
            .iter()
            .any(|entry| entry.main_application_id == main_application_id))
    }
}
