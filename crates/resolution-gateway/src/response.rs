use crate::model::ErrorResponse;
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use resolution_service::RedirectDecision;
use tracing::error;

/// A [`RedirectDecision`] as an HTTP response.
///
/// Redirects are `302 Found`. Views are served as JSON in either format.
pub struct DecisionResponse(pub RedirectDecision);

impl IntoResponse for DecisionResponse {
    fn into_response(self) -> Response {
        match self.0 {
            RedirectDecision::Redirect(url) => match HeaderValue::from_str(&url) {
                Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
                Err(_) => {
                    error!(url = %url, "redirect target is not a valid header value");
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect URL", None)
                }
            },
            RedirectDecision::Render { view, .. } => (StatusCode::OK, Json(view)).into_response(),
            RedirectDecision::Disambiguate(choice) => {
                (StatusCode::OK, Json(choice)).into_response()
            }
            RedirectDecision::NotFound => error_response(StatusCode::NOT_FOUND, "Not found", None),
            RedirectDecision::Error(e) => {
                let status =
                    StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    error!(error = %e, "request failed");
                }
                error_response(status, e.to_string(), e.service().map(|s| s.as_str()))
            }
        }
    }
}

fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    source: Option<&'static str>,
) -> Response {
    let body = ErrorResponse::new(status.as_u16(), message, source);
    (status, Json(body)).into_response()
}
