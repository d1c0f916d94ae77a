use super::request_host;
use crate::response::DecisionResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, Uri};
use resolution_core::ResolveError;
use resolution_service::RedirectDecision;

/// Resolves the hub key that is the request's own URL.
pub async fn hub_key_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> DecisionResponse {
    let Some(host) = request_host(&headers, &uri) else {
        return DecisionResponse(RedirectDecision::Error(ResolveError::InvalidHubKey(
            "missing host".to_owned(),
        )));
    };
    let path = uri.path_and_query().map_or(uri.path(), |p| p.as_str());
    let hub_key = format!("{}://{}{}", state.public_scheme, host, path);

    DecisionResponse(state.hub_keys.handle(&hub_key, wants_json(&headers)).await)
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split([',', ';']))
        .any(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}
