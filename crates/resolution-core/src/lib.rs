//! Core types and traits for the hub key resolution service.
//!
//! This crate provides the data model shared by the backend clients and the
//! resolution service: parsed hub keys, providers and their link
//! configuration, source identifiers, the URL template DSL used by reference
//! and payment links, and the backend port traits.

pub mod backend;
pub mod error;
pub mod hubkey;
pub mod identifier;
pub mod provider;
pub mod template;

pub use backend::{AssetQuery, IdentifierIndex, OrganisationDirectory, RepositoryService};
pub use error::{BackendError, BackendResult, ResolveError, Result, Service, TemplateError};
pub use hubkey::{HubKey, KeyIds, ResolvedKey, SchemaVersion};
pub use identifier::{RepositoryEntity, RepositoryInfo, SourceIdentifier};
pub use provider::{PaymentConfig, Provider, ReferenceLinks};
pub use template::UrlTemplate;
