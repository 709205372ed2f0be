//! Claim configuration types.
//!
//! Claim configuration describes which identity attributes an application
//! requests and how they map onto local claims. Fragments never keep a local
//! copy of it; they inherit it from their main application at read time.

use serde::{Deserialize, Serialize};

/// Identity claims requested by an application and their mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimConfig {
    /// Claim URI carrying the user's roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_claim_uri: Option<String>,

    /// Claim URI used as the subject identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_claim_uri: Option<String>,

    /// Whether the application uses the local claim dialect.
    pub local_claim_dialect: bool,

    /// Send the mapped local subject id instead of the federated one.
    pub always_send_mapped_local_subject_id: bool,

    /// Requested claims and their local mappings.
    pub claim_mappings: Vec<ClaimMapping>,
}

impl ClaimConfig {
    /// Returns the mappings the application marked as requested.
    pub fn requested_claims(&self) -> impl Iterator<Item = &ClaimMapping> {
        self.claim_mappings.iter().filter(|m| m.requested)
    }

    /// Returns the mappings the application marked as mandatory.
    pub fn mandatory_claims(&self) -> impl Iterator<Item = &ClaimMapping> {
        self.claim_mappings.iter().filter(|m| m.mandatory)
    }
}

/// Mapping between a local claim and the claim URI an application sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimMapping {
    pub local_claim: String,

    pub remote_claim: String,

    #[serde(default)]
    pub requested: bool,

    #[serde(default)]
    pub mandatory: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ClaimMapping {
    /// Creates a requested, optional mapping.
    pub fn requested(local_claim: impl Into<String>, remote_claim: impl Into<String>) -> Self {
        Self {
            local_claim: local_claim.into(),
            remote_claim: remote_claim.into(),
            requested: true,
            mandatory: false,
            default_value: None,
        }
    }

    /// Marks the mapping as mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_and_mandatory_filters() {
        let config = ClaimConfig {
            claim_mappings: vec![
                ClaimMapping::requested("http://example.org/claims/emailaddress", "email").mandatory(),
                ClaimMapping::requested("http://example.org/claims/givenname", "given_name"),
                ClaimMapping {
                    local_claim: "http://example.org/claims/country".to_string(),
                    remote_claim: "country".to_string(),
                    requested: false,
                    mandatory: false,
                    default_value: Some("LK".to_string()),
                },
            ],
            ..Default::default()
        };

        assert_eq!(config.requested_claims().count(), 2);
        assert_eq!(config.mandatory_claims().count(), 1);
    }

    #[test]
    fn test_claim_config_deserializes_with_defaults() {
        let config: ClaimConfig = serde_json::from_str(
            r#"{"claimMappings":[{"localClaim":"a","remoteClaim":"b","requested":true}]}"#,
        )
        .unwrap();

        assert!(!config.local_claim_dialect);
        assert!(config.role_claim_uri.is_none());
        assert_eq!(config.claim_mappings.len(), 1);
        assert!(!config.claim_mappings[0].mandatory);
    }
}
