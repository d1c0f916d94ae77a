//! HTTP front of the hub key resolver.
//!
//! Hub key URLs (`/s0/...`, `/s1/...`) go to the
//! [`HubKeyHandler`][resolution_service::HubKeyHandler]; every other path is
//! read as a `hubpid`/`hubidt`/`hubaid`/`hubjson` query and goes to the
//! [`QueryRouter`][resolution_service::QueryRouter]. Decisions are mapped
//! onto responses in [`response`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod response;
pub mod state;

pub use app::App;
pub use error::GatewayError;
pub use state::AppState;
