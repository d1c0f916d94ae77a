use crate::backends::Backends;
use crate::links::ReferenceLinkResolver;
use crate::pipeline::ResolutionPipeline;
use crate::view::{RedirectDecision, View};
use resolution_core::Result;
use tracing::{debug, warn};

/// Entry point for requests that carry a full hub key.
#[derive(Clone)]
pub struct HubKeyHandler {
    pipeline: ResolutionPipeline,
    links: ReferenceLinkResolver,
}

impl HubKeyHandler {
    pub fn new(backends: &Backends) -> Self {
        Self {
            pipeline: ResolutionPipeline::from_backends(backends),
            links: ReferenceLinkResolver::from_backends(backends),
        }
    }

    pub async fn handle(&self, raw_hub_key: &str, want_json: bool) -> RedirectDecision {
        match self.try_handle(raw_hub_key, want_json).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    hub_key = raw_hub_key,
                    status = e.status(),
                    error = %e,
                    "hub key not resolved"
                );
                RedirectDecision::Error(e)
            }
        }
    }

    async fn try_handle(&self, raw_hub_key: &str, want_json: bool) -> Result<RedirectDecision> {
        let resolved = self.pipeline.resolve(raw_hub_key).await?;
        let link = self
            .links
            .resolve_link(resolved.provider.reference_links.as_ref(), &resolved)
            .await?;

        Ok(match link {
            Some(link) => {
                debug!(hub_key = %resolved.key, link = %link, "redirecting to reference link");
                RedirectDecision::Redirect(link)
            }
            None => RedirectDecision::render(View::HubKey(resolved), want_json),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::ResponseFormat;
    use resolution_clients::Call;
    use resolution_core::{ResolveError, SourceIdentifier};
    use serde_json::json;

    #[tokio::test]
    async fn renders_key_without_reference_links() {
        let (backend, backends) = fixtures::backend();
        let mut org = fixtures::provider("orgA", "Org A");
        org.website = "example.org".to_owned();
        backend.insert_organisation(org);
        let handler = HubKeyHandler::new(&backends);

        let decision = handler
            .handle("https://host/s0/hub1/asset/orgA/isbn/12345", false)
            .await;

        let RedirectDecision::Render {
            view: View::HubKey(resolved),
            format,
        } = decision
        else {
            panic!("expected a hub key view, got {decision:?}");
        };
        assert_eq!(format, ResponseFormat::Html);
        assert_eq!(resolved.provider.website, "http://example.org");
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({
                "resolver_id": "https://host",
                "hub_id": "hub1",
                "entity_type": "asset",
                "schema_version": "s0",
                "organisation_id": "orgA",
                "id_type": "isbn",
                "entity_id": "12345",
                "hub_key": "https://host/s0/hub1/asset/orgA/isbn/12345",
                "provider": {"id": "orgA", "name": "Org A", "website": "http://example.org"}
            })
        );
    }

    #[tokio::test]
    async fn redirects_s1_key_to_reference_link() {
        let (backend, backends) = fixtures::backend();
        backend.insert_repository("repo1", fixtures::repository("orgA"));
        let mut org = fixtures::provider("orgA", "Org A");
        org.reference_links = Some(fixtures::links(
            "ppi",
            &[("ppi", "https://pictures.example/{source_id}")],
        ));
        backend.insert_organisation(org);
        backend.insert_asset_ids(
            "repo1",
            "ent1",
            vec![SourceIdentifier::new("PPI", "10413373")],
        );
        let handler = HubKeyHandler::new(&backends);

        let decision = handler
            .handle("https://host/s1/hub1/repo1/asset/ent1", false)
            .await;

        assert_eq!(
            decision,
            RedirectDecision::Redirect("https://pictures.example/10413373".to_owned())
        );
        assert_eq!(backend.calls(Call::AssetDetails), 0);
    }

    #[tokio::test]
    async fn invalid_key_is_an_error_decision() {
        let (_backend, backends) = fixtures::backend();
        let handler = HubKeyHandler::new(&backends);

        let decision = handler.handle("https://host/s1/hub1", true).await;

        assert!(matches!(
            decision,
            RedirectDecision::Error(ResolveError::InvalidHubKey(_))
        ));
    }
}
