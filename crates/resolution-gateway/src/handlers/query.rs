use super::request_host;
use crate::response::DecisionResponse;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Uri};
use resolution_service::QueryRequest;

/// Resolves an asset named by `hubpid`, `hubidt` and `hubaid`.
pub async fn query_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> DecisionResponse {
    let host = request_host(&headers, &uri).map(str::to_owned);
    let request = QueryRequest::from_pairs(pairs, host);
    DecisionResponse(state.router.route(request).await)
}
