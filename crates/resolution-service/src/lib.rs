//! Hub key resolution on top of the backend ports.
//!
//! Two entry points produce a [`RedirectDecision`]:
//!
//! - [`HubKeyHandler`] for a hub key URL (`/s0/...`, `/s1/...`),
//! - [`QueryRouter`] for the `hubpid`/`hubidt`/`hubaid`/`hubjson` query
//!   parameters plus an optional provider subdomain.
//!
//! Both are composed from a [`ResolutionPipeline`], which attaches the owning
//! provider to a parsed key, and a [`ReferenceLinkResolver`], which decides
//! whether the provider wants the lookup redirected. Asset lookups by external
//! identifier go through the [`AssetRedirectOrchestrator`], which falls back to
//! an [`AssetView`] built from the query service's statement graphs.
//!
//! # Example
//!
//! ```rust,no_run
//! use resolution_service::{Backends, HubKeyHandler, RedirectDecision};
//!
//! # async fn example(backends: Backends) {
//! let handler = HubKeyHandler::new(&backends);
//! let decision = handler
//!     .handle("https://openpermissions.org/s1/hub1/repo1/asset/ent1", true)
//!     .await;
//! if let RedirectDecision::Redirect(url) = decision {
//!     println!("Redirect to: {url}");
//! }
//! # }
//! ```

pub mod backends;
pub mod cached;
pub mod config;
pub mod handler;
pub mod links;
pub mod orchestrator;
pub mod pipeline;
pub mod projection;
pub mod router;
pub mod view;

pub use backends::Backends;
pub use cached::{CachedDirectory, CachedQuery};
pub use config::{RouterConfig, ServiceConfig};
pub use handler::HubKeyHandler;
pub use links::ReferenceLinkResolver;
pub use orchestrator::AssetRedirectOrchestrator;
pub use pipeline::ResolutionPipeline;
pub use router::{QueryRequest, QueryRouter};
pub use view::{
    AssetIdView, AssetView, Disambiguation, OfferView, RedirectDecision, ResponseFormat, View,
};
