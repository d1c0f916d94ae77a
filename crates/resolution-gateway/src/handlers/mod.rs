mod health;
mod hub_key;
mod query;

pub use health::health_handler;
pub use hub_key::hub_key_handler;
pub use query::query_handler;

use axum::http::header::HOST;
use axum::http::{HeaderMap, Uri};

/// The host a request was addressed to, from the `Host` header or an
/// absolute request URI.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
}
