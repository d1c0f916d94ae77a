use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, hub_key_handler, query_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/s0/{*rest}", get(hub_key_handler))
            .route("/s1/{*rest}", get(hub_key_handler))
            .route("/", get(query_handler))
            .fallback(query_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{ACCEPT, HOST, LOCATION};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use resolution_clients::InMemoryBackend;
    use resolution_core::{
        BackendError, Provider, ReferenceLinks, RepositoryInfo, Service, SourceIdentifier,
    };
    use resolution_service::{Backends, RouterConfig, ServiceConfig};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Arc<InMemoryBackend>, Router) {
        let backend = Arc::new(InMemoryBackend::new());
        let backends = Backends::shared(Arc::clone(&backend));
        let state = AppState::new(
            &backends,
            ServiceConfig::default(),
            RouterConfig::default(),
            "https",
        )
        .unwrap();
        (backend, App::router(state))
    }

    fn organisation(id: &str, name: &str) -> Provider {
        Provider {
            id: id.to_owned(),
            name: name.to_owned(),
            website: "example.org".to_owned(),
            ..Provider::default()
        }
    }

    fn get_request(uri: &str, host: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (_backend, app) = app();

        let response = app.oneshot(get_request("/health", "localhost")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn hub_key_redirects_to_reference_link() {
        let (backend, app) = app();
        let mut org = organisation("orgA", "Org A");
        org.reference_links = Some(ReferenceLinks {
            redirect_id_type: Some("ppi".to_owned()),
            links: [("ppi".to_owned(), "https://pictures.example/{source_id}".to_owned())]
                .into_iter()
                .collect(),
        });
        backend.insert_organisation(org);
        backend.insert_repository(
            "repo1",
            RepositoryInfo {
                organisation_id: "orgA".to_owned(),
                service_location: None,
            },
        );
        backend.insert_asset_ids("repo1", "ent1", vec![SourceIdentifier::new("ppi", "10413373")]);

        let response = app
            .oneshot(get_request("/s1/hub1/repo1/asset/ent1", "copyrighthub.org"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://pictures.example/10413373"
        );
    }

    #[tokio::test]
    async fn hub_key_without_links_renders_json() {
        let (backend, app) = app();
        backend.insert_organisation(organisation("orgA", "Org A"));
        let request = Request::builder()
            .uri("/s0/hub1/asset/orgA/isbn/12345")
            .header(HOST, "copyrighthub.org")
            .header(ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body["hub_key"],
            "https://copyrighthub.org/s0/hub1/asset/orgA/isbn/12345"
        );
        assert_eq!(body["provider"]["website"], "http://example.org");
    }

    #[tokio::test]
    async fn malformed_hub_key_is_not_found() {
        let (_backend, app) = app();

        let response = app
            .oneshot(get_request("/s1/hub1", "copyrighthub.org"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn upstream_failure_keeps_its_status() {
        let (backend, app) = app();
        backend.fail(
            Service::Directory,
            BackendError::unexpected(Service::Directory, Some(503), "GET /x returned 503"),
        );

        let response = app
            .oneshot(get_request("/s0/hub1/asset/orgA/isbn/12345", "copyrighthub.org"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["source"], "directory");
    }

    #[tokio::test]
    async fn empty_query_redirects_to_default_website() {
        let (_backend, app) = app();

        let response = app.oneshot(get_request("/", "localhost:8009")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "http://openpermissions.org/");
    }

    #[tokio::test]
    async fn unmatched_paths_are_read_as_queries() {
        let (backend, app) = app();
        backend.insert_licensors(
            "isbn",
            "978",
            vec![organisation("orgA", "Org A"), organisation("orgB", "Org B")],
        );

        let response = app
            .oneshot(get_request("/anything?hubidt=isbn&hubaid=978", "localhost"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["providers"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn conflicting_subdomain_is_a_bad_request() {
        let (_backend, app) = app();

        let response = app
            .oneshot(get_request("/?hubpid=other", "maryevans.copyrighthub.org"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_asset_is_not_found() {
        let (backend, app) = app();
        backend.insert_organisation(organisation("org1", "maryevans"));

        let response = app
            .oneshot(get_request(
                "/?hubpid=maryevans&hubidt=ppi&hubaid=404",
                "localhost",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejects_unknown_scheme() {
        let backends = Backends::shared(Arc::new(InMemoryBackend::new()));
        let result = AppState::new(
            &backends,
            ServiceConfig::default(),
            RouterConfig::default(),
            "ftp",
        );
        assert!(result.is_err());
    }
}
