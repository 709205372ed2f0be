//! Collaborator traits the guard depends on.
//!
//! This module defines the narrow interfaces through which the guard reaches
//! the host platform:
//!
//! - [`ApplicationStore`] - application lookups by resource id and by name
//! - [`OrganizationResolver`] - tenant domain <-> organization id mapping
//! - [`FragmentLinkStore`] - fragment-to-main application links
//!
//! # Implementations
//!
//! In-memory implementations are provided by the `orgapp-memory` crate.
//! Hosts wire their own backends at startup.

pub mod application;
pub mod fragment;
pub mod organization;

pub use application::ApplicationStore;
pub use fragment::FragmentLinkStore;
pub use organization::OrganizationResolver;
