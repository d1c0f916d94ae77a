use crate::error::ClientError;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use resolution_core::{BackendError, BackendResult, Service};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace, warn};
use url::Url;

/// Backend responses wrap their payload as `{"status": .., "data": ..}`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// A JSON API rooted at a base URL, tagged with the service it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct JsonApi {
    client: reqwest::Client,
    base: Url,
    service: Service,
}

impl JsonApi {
    pub(crate) fn new(
        client: reqwest::Client,
        base: Url,
        service: Service,
    ) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base.to_string()));
        }
        Ok(Self {
            client,
            base,
            service,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn endpoint_with_query(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut().extend_pairs(query);
        url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> BackendResult<T> {
        trace!(service = %self.service, url = %url, "calling backend");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(service = %self.service, url = %url, error = %e, "backend unreachable");
                BackendError::unexpected(self.service, None, e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(service = %self.service, url = %url, "backend returned not found");
            return Err(BackendError::not_found(
                self.service,
                format!("GET {} returned {}", url.path(), status),
            ));
        }
        if !status.is_success() {
            warn!(
                service = %self.service,
                url = %url,
                status = status.as_u16(),
                "backend call failed"
            );
            return Err(BackendError::unexpected(
                self.service,
                Some(status.as_u16()),
                format!("GET {} returned {}", url.path(), status),
            ));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            BackendError::unexpected(
                self.service,
                Some(status.as_u16()),
                format!("invalid response body from GET {}: {e}", url.path()),
            )
        })?;
        Ok(envelope.data)
    }
}
