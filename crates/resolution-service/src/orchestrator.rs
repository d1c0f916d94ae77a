use crate::backends::Backends;
use crate::config::ServiceConfig;
use crate::links::ReferenceLinkResolver;
use crate::pipeline::ResolutionPipeline;
use crate::projection;
use crate::view::{AssetIdView, AssetView, OfferView, RedirectDecision, View};
use resolution_core::{
    AssetQuery, BackendError, HubKey, IdentifierIndex, Provider, ResolvedKey, Result,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use url::Url;

const ASSET_ENTITY_TYPE: &str = "asset";

/// Query parameters the query entry point consumes itself.
pub const ROUTING_PARAMS: [&str; 4] = ["hubpid", "hubidt", "hubaid", "hubjson"];

/// Resolves an asset named by a provider and one of its external ids.
#[derive(Clone)]
pub struct AssetRedirectOrchestrator {
    index: Arc<dyn IdentifierIndex>,
    query: Arc<dyn AssetQuery>,
    links: ReferenceLinkResolver,
    config: ServiceConfig,
}

impl AssetRedirectOrchestrator {
    pub fn new(backends: &Backends, config: ServiceConfig) -> Self {
        Self {
            index: Arc::clone(&backends.index),
            query: Arc::clone(&backends.query),
            links: ReferenceLinkResolver::from_backends(backends),
            config,
        }
    }

    /// Redirects to the provider's reference link for the asset when it has
    /// one, and renders the asset with its offers otherwise.
    ///
    /// `forwarded` holds the caller's query parameters; all but the routing
    /// parameters are appended to a reference link.
    pub async fn resolve_and_redirect(
        &self,
        provider: Provider,
        id_type: &str,
        entity_id: &str,
        want_json: bool,
        forwarded: &[(String, String)],
    ) -> RedirectDecision {
        match self
            .try_resolve(provider, id_type, entity_id, want_json, forwarded)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                warn!(id_type, entity_id, error = %e, "asset resolution failed");
                RedirectDecision::Error(e)
            }
        }
    }

    async fn try_resolve(
        &self,
        provider: Provider,
        id_type: &str,
        entity_id: &str,
        want_json: bool,
        forwarded: &[(String, String)],
    ) -> Result<RedirectDecision> {
        let entries = match self.index.repositories_for_source_id(id_type, entity_id).await {
            Ok(entries) => entries,
            Err(BackendError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let Some(entry) = entries.into_iter().next() else {
            debug!(id_type, entity_id, "asset not in index");
            return Ok(RedirectDecision::NotFound);
        };

        let key = HubKey::s1(
            &self.config.resolver_id,
            &self.config.hub_id,
            entry.repository_id,
            ASSET_ENTITY_TYPE,
            entry.entity_id,
        )?;
        let resolved = ResolutionPipeline::attach(key, provider);

        if let Some(link) = self
            .links
            .resolve_link(resolved.provider.reference_links.as_ref(), &resolved)
            .await?
        {
            let link = merge_query(link, forwarded);
            debug!(hub_key = %resolved.key, link = %link, "redirecting to reference link");
            return Ok(RedirectDecision::Redirect(link));
        }

        let view = self.asset_view(resolved, id_type, entity_id).await?;
        Ok(RedirectDecision::render(View::Asset(view), want_json))
    }

    async fn asset_view(
        &self,
        resolved: ResolvedKey,
        id_type: &str,
        entity_id: &str,
    ) -> Result<AssetView> {
        let graph = match self.query.asset_details(&resolved.key.hub_key).await {
            Ok(graph) => graph,
            Err(BackendError::NotFound { .. }) => {
                trace!(hub_key = %resolved.key, "no asset details");
                Value::Null
            }
            Err(e) => return Err(e.into()),
        };
        let details = projection::project_asset(&graph);

        let offers: Vec<_> = self
            .query
            .search_offers(id_type, entity_id)
            .await?
            .iter()
            .flat_map(projection::project_offers)
            .collect();
        let payment_link = match &resolved.provider.payment {
            Some(payment) if !offers.is_empty() => {
                self.links.payment_link(payment, &resolved).await?
            }
            _ => None,
        };
        let offers = offers
            .into_iter()
            .map(|offer| -> Result<OfferView> {
                let payment_link = match &payment_link {
                    Some(link) => link.render(&resolved.key, &offer.id)?,
                    None => None,
                };
                Ok(OfferView {
                    title: offer.title,
                    description: offer.description,
                    payment_link,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AssetView {
            provider: resolved.provider,
            assets: details
                .identifiers
                .into_iter()
                .map(|id| AssetIdView {
                    id: id.value,
                    id_type: id.id_type,
                })
                .collect(),
            description: details.description,
            offers,
        })
    }
}

/// Appends the caller's non-routing query parameters to `link`.
fn merge_query(link: String, forwarded: &[(String, String)]) -> String {
    let mut extra = forwarded
        .iter()
        .filter(|(name, _)| !ROUTING_PARAMS.contains(&name.as_str()))
        .peekable();
    if extra.peek().is_none() {
        return link;
    }
    match Url::parse(&link) {
        Ok(mut url) => {
            url.query_pairs_mut().extend_pairs(extra);
            url.into()
        }
        Err(e) => {
            warn!(link = %link, error = %e, "reference link is not a URL, query not forwarded");
            link
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use resolution_clients::{Call, InMemoryBackend};
    use resolution_core::{
        PaymentConfig, RepositoryEntity, ResolveError, Service, SourceIdentifier,
    };
    use serde_json::json;

    const KEY: &str = "https://openpermissions.org/s1/hub1/repo1/asset/ent1";

    fn orchestrator() -> (Arc<InMemoryBackend>, AssetRedirectOrchestrator) {
        let (backend, backends) = fixtures::backend();
        backend.insert_index_entry(
            "isbn",
            "978-3-16",
            vec![
                RepositoryEntity::new("repo1", "ent1"),
                RepositoryEntity::new("repo2", "ent2"),
            ],
        );
        (
            backend,
            AssetRedirectOrchestrator::new(&backends, ServiceConfig::default()),
        )
    }

    fn forwarded(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn unknown_asset_is_not_found() {
        let (backend, orchestrator) = orchestrator();

        let decision = orchestrator
            .resolve_and_redirect(fixtures::provider("orgA", "A"), "isbn", "0000", false, &[])
            .await;

        assert_eq!(decision, RedirectDecision::NotFound);
        assert_eq!(backend.calls(Call::AssetDetails), 0);
    }

    #[tokio::test]
    async fn reference_link_skips_asset_details() {
        let (backend, orchestrator) = orchestrator();
        backend.insert_asset_ids(
            "repo1",
            "ent1",
            vec![SourceIdentifier::new("isbn", "978-3-16")],
        );
        let mut provider = fixtures::provider("orgA", "A");
        provider.reference_links = Some(fixtures::links(
            "isbn",
            &[("isbn", "https://books.example/lookup?isbn={source_id}")],
        ));

        let decision = orchestrator
            .resolve_and_redirect(
                provider,
                "isbn",
                "978-3-16",
                false,
                &forwarded(&[("hubidt", "isbn"), ("hubaid", "978-3-16"), ("lang", "en")]),
            )
            .await;

        assert_eq!(
            decision,
            RedirectDecision::Redirect(
                "https://books.example/lookup?isbn=978-3-16&lang=en".to_owned()
            )
        );
        assert_eq!(backend.calls(Call::AssetDetails), 0);
        assert_eq!(backend.calls(Call::SearchOffers), 0);
        assert_eq!(backend.calls(Call::OrganisationById), 0);
    }

    #[tokio::test]
    async fn renders_asset_view_with_offers() {
        let (backend, orchestrator) = orchestrator();
        backend.insert_asset_ids("repo1", "ent1", vec![SourceIdentifier::new("ppi", "p 1")]);
        backend.insert_asset_details(
            KEY,
            json!({"@graph": [
                {"@type": "op:Id", "op:value": "978-3-16", "op:id_type": "isbn"},
                {"@type": "op:Asset", "dcterms:description": "A book"}
            ]}),
        );
        backend.insert_offers(
            "isbn",
            "978-3-16",
            vec![json!({"@graph": [
                {"@id": "offer-1", "@type": "odrl:Offer", "dcterms:title": "Personal"}
            ]})],
        );
        let mut provider = fixtures::provider("orgA", "A");
        provider.website = "example.org".to_owned();
        provider.payment = Some(PaymentConfig {
            source_id_type: "ppi".to_owned(),
            url_template: "https://pay.example/{source_id}/{offer_id}".to_owned(),
        });

        let decision = orchestrator
            .resolve_and_redirect(provider, "isbn", "978-3-16", true, &[])
            .await;

        let RedirectDecision::Render {
            view: View::Asset(view),
            format,
        } = decision
        else {
            panic!("expected an asset view, got {decision:?}");
        };
        assert_eq!(format, crate::ResponseFormat::Json);
        assert_eq!(view.provider.website, "http://example.org");
        assert_eq!(
            view.assets,
            vec![AssetIdView {
                id: "978-3-16".into(),
                id_type: "isbn".into()
            }]
        );
        assert_eq!(view.description, "A book");
        assert_eq!(
            view.offers,
            vec![OfferView {
                title: "Personal".into(),
                description: String::new(),
                payment_link: Some("https://pay.example/p+1/offer-1".into()),
            }]
        );
    }

    #[tokio::test]
    async fn payment_ids_are_fetched_once_per_asset() {
        let (backend, orchestrator) = orchestrator();
        backend.insert_asset_ids("repo1", "ent1", vec![SourceIdentifier::new("ppi", "p1")]);
        backend.insert_offers(
            "isbn",
            "978-3-16",
            vec![
                json!({"@graph": [{"@id": "offer-1", "@type": "odrl:Offer"}]}),
                json!({"@graph": [{"@id": "offer-2", "@type": "odrl:Offer"}]}),
            ],
        );
        let mut provider = fixtures::provider("orgA", "A");
        provider.payment = Some(PaymentConfig {
            source_id_type: "ppi".to_owned(),
            url_template: "https://pay.example/{source_id}/{offer_id}".to_owned(),
        });

        let decision = orchestrator
            .resolve_and_redirect(provider, "isbn", "978-3-16", true, &[])
            .await;

        let RedirectDecision::Render {
            view: View::Asset(view),
            ..
        } = decision
        else {
            panic!("expected an asset view, got {decision:?}");
        };
        let links: Vec<_> = view
            .offers
            .iter()
            .map(|offer| offer.payment_link.as_deref())
            .collect();
        assert_eq!(
            links,
            vec![
                Some("https://pay.example/p1/offer-1"),
                Some("https://pay.example/p1/offer-2"),
            ]
        );
        assert_eq!(backend.calls(Call::IdsForAsset), 1);
    }

    #[tokio::test]
    async fn dot_segment_entity_is_an_error_decision() {
        let (backend, orchestrator) = orchestrator();
        backend.insert_index_entry("isbn", "dots", vec![RepositoryEntity::new("repo1", "..")]);

        let decision = orchestrator
            .resolve_and_redirect(fixtures::provider("orgA", "A"), "isbn", "dots", false, &[])
            .await;

        assert!(matches!(
            decision,
            RedirectDecision::Error(ResolveError::InvalidHubKey(_))
        ));
        assert_eq!(backend.calls(Call::AssetDetails), 0);
    }

    #[tokio::test]
    async fn first_index_entry_is_used() {
        let (backend, orchestrator) = orchestrator();
        backend.insert_asset_details(
            KEY,
            json!([{"@type": "Asset", "description": "from repo1"}]),
        );
        backend.insert_asset_details(
            "https://openpermissions.org/s1/hub1/repo2/asset/ent2",
            json!([{"@type": "Asset", "description": "from repo2"}]),
        );

        let decision = orchestrator
            .resolve_and_redirect(fixtures::provider("orgA", "A"), "isbn", "978-3-16", false, &[])
            .await;

        let RedirectDecision::Render {
            view: View::Asset(view),
            ..
        } = decision
        else {
            panic!("expected an asset view, got {decision:?}");
        };
        assert_eq!(view.description, "from repo1");
        assert_eq!(backend.calls(Call::AssetDetails), 1);
    }

    #[tokio::test]
    async fn missing_details_render_empty_view() {
        let (_backend, orchestrator) = orchestrator();

        let decision = orchestrator
            .resolve_and_redirect(fixtures::provider("orgA", "A"), "isbn", "978-3-16", false, &[])
            .await;

        let RedirectDecision::Render {
            view: View::Asset(view),
            ..
        } = decision
        else {
            panic!("expected an asset view, got {decision:?}");
        };
        assert!(view.assets.is_empty());
        assert!(view.description.is_empty());
        assert!(view.offers.is_empty());
    }

    #[tokio::test]
    async fn query_failure_is_an_error_decision() {
        let (backend, orchestrator) = orchestrator();
        backend.fail(
            Service::Query,
            BackendError::unexpected(Service::Query, Some(500), "boom"),
        );

        let decision = orchestrator
            .resolve_and_redirect(fixtures::provider("orgA", "A"), "isbn", "978-3-16", false, &[])
            .await;

        assert!(matches!(
            decision,
            RedirectDecision::Error(ResolveError::UpstreamError {
                service: Service::Query,
                ..
            })
        ));
    }

    #[test]
    fn merge_query_drops_routing_params() {
        let link = merge_query(
            "https://books.example/x?a=1".to_owned(),
            &forwarded(&[("hubpid", "orgA"), ("hubjson", "1"), ("b", "two words")]),
        );
        assert_eq!(link, "https://books.example/x?a=1&b=two+words");

        let untouched = merge_query(
            "https://books.example/x".to_owned(),
            &forwarded(&[("hubpid", "orgA")]),
        );
        assert_eq!(untouched, "https://books.example/x");
    }
}
