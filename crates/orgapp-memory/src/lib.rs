//! In-memory collaborator backends for `orgapp-guard`.
//!
//! These implementations keep everything in `dashmap` maps and are meant for
//! tests and embedded deployments. Each backend can be switched into an
//! unavailable state to exercise the guard's error paths.

mod application;
mod fragment;
mod organization;

pub use application::InMemoryApplicationStore;
pub use fragment::InMemoryFragmentLinks;
pub use organization::InMemoryOrganizations;
