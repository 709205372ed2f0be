//! Error types for application and organization management.
//!
//! Two error kinds cross the guard's boundary:
//!
//! - [`OrgMgtError`] - raised by organization-side collaborators
//!   (organization resolution, fragment links). Split into client and server
//!   errors, each carrying a stable [`OrgErrorCode`].
//! - [`AppMgtError`] - the host's application-management error kind. Every
//!   hook returns it; organization errors are wrapped with a readable message.

use std::fmt;

/// Boxed error used as the cause of backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Organization Management Errors
// =============================================================================

/// Stable error codes for organization-management failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrgErrorCode {
    /// A referenced application does not exist.
    InvalidApplication,
    /// The main application of a fragment could not be resolved.
    ErrorResolvingMainApplication,
    /// A tenant domain could not be mapped to an organization.
    ErrorResolvingOrganization,
    /// An organization could not be mapped to a tenant domain.
    ErrorResolvingTenantDomain,
    /// The fragment-link lookup for a main application failed.
    ErrorCheckingFragments,
    /// The fragment-link lookup for a fragment failed.
    ErrorRetrievingMainApplication,
}

impl OrgErrorCode {
    /// Returns the stable, externally visible code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidApplication => "ORG-60026",
            Self::ErrorResolvingMainApplication => "ORG-65034",
            Self::ErrorResolvingOrganization => "ORG-65035",
            Self::ErrorResolvingTenantDomain => "ORG-65036",
            Self::ErrorCheckingFragments => "ORG-65037",
            Self::ErrorRetrievingMainApplication => "ORG-65038",
        }
    }

    /// Returns the short message for the code.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidApplication => "Invalid application.",
            Self::ErrorResolvingMainApplication => "Unable to resolve the main application.",
            Self::ErrorResolvingOrganization => "Unable to resolve the organization.",
            Self::ErrorResolvingTenantDomain => "Unable to resolve the tenant domain.",
            Self::ErrorCheckingFragments => "Unable to check the fragments of the application.",
            Self::ErrorRetrievingMainApplication => {
                "Unable to retrieve the main application of the fragment."
            }
        }
    }

    /// Returns the description template; each `%s` is replaced by an argument.
    #[must_use]
    pub fn description_template(&self) -> &'static str {
        match self {
            Self::InvalidApplication => "The provided application %s is invalid.",
            Self::ErrorResolvingMainApplication => {
                "Unable to resolve the main application for the fragment application %s in organization %s."
            }
            Self::ErrorResolvingOrganization => {
                "Unable to resolve the organization of tenant domain %s."
            }
            Self::ErrorResolvingTenantDomain => {
                "Unable to resolve the tenant domain of organization %s."
            }
            Self::ErrorCheckingFragments => {
                "Unable to check whether the application %s has fragments."
            }
            Self::ErrorRetrievingMainApplication => {
                "Unable to retrieve the main application of fragment %s in organization %s."
            }
        }
    }

    /// Formats the description template with the given arguments in order.
    #[must_use]
    pub fn describe(&self, args: &[&str]) -> String {
        let mut parts = self.description_template().split("%s");
        let mut out = parts.next().unwrap_or_default().to_string();
        let mut args = args.iter();
        for part in parts {
            out.push_str(args.next().copied().unwrap_or_default());
            out.push_str(part);
        }
        out
    }
}

impl fmt::Display for OrgErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors raised by organization-management collaborators.
#[derive(Debug, thiserror::Error)]
pub enum OrgMgtError {
    /// The caller referenced something that does not exist or is not allowed.
    #[error("{code} - {message} {description}")]
    Client {
        code: OrgErrorCode,
        message: String,
        description: String,
    },

    /// A backend or resolution failure.
    #[error("{code} - {message} {description}")]
    Server {
        code: OrgErrorCode,
        message: String,
        description: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl OrgMgtError {
    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> OrgErrorCode {
        match self {
            Self::Client { code, .. } | Self::Server { code, .. } => *code,
        }
    }

    /// Returns the formatted description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Client { description, .. } | Self::Server { description, .. } => description,
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// Builds a client error for `code`, formatting its description with `args`.
#[must_use]
pub fn handle_client_error(code: OrgErrorCode, args: &[&str]) -> OrgMgtError {
    OrgMgtError::Client {
        code,
        message: code.message().to_string(),
        description: code.describe(args),
    }
}

/// Builds a server error for `code` caused by `source`.
#[must_use]
pub fn handle_server_error(
    code: OrgErrorCode,
    source: impl Into<BoxError>,
    args: &[&str],
) -> OrgMgtError {
    OrgMgtError::Server {
        code,
        message: code.message().to_string(),
        description: code.describe(args),
        source: Some(source.into()),
    }
}

// =============================================================================
// Application Management Errors
// =============================================================================

/// The host's application-management error kind.
#[derive(Debug, thiserror::Error)]
pub enum AppMgtError {
    /// The application store failed.
    #[error("Application store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// An organization-management failure surfaced through an application hook.
    #[error("{message}")]
    Organization {
        message: String,
        #[source]
        source: OrgMgtError,
    },
}

impl AppMgtError {
    /// Creates a `Store` error without a cause.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `Store` error caused by `source`.
    #[must_use]
    pub fn store_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Wraps an organization-management error with a readable message.
    #[must_use]
    pub fn organization(message: impl Into<String>, source: OrgMgtError) -> Self {
        Self::Organization {
            message: message.into(),
            source,
        }
    }

    /// Returns the wrapped organization error, if any.
    #[must_use]
    pub fn organization_error(&self) -> Option<&OrgMgtError> {
        match self {
            Self::Organization { source, .. } => Some(source),
            Self::Store { .. } => None,
        }
    }

    /// Returns `true` if the caller can correct the failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.organization_error()
            .is_some_and(OrgMgtError::is_client_error)
    }

    /// Returns `true` if the failure is on the server side.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Store { .. } => ErrorCategory::Infrastructure,
            Self::Organization { source, .. } if source.is_client_error() => {
                ErrorCategory::Validation
            }
            Self::Organization { .. } => ErrorCategory::Resolution,
        }
    }
}

/// Categories of guard errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller-correctable input problems.
    Validation,
    /// Store or backend failures.
    Infrastructure,
    /// Organization or main-application resolution failures.
    Resolution,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}
