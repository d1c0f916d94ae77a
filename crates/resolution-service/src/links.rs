use crate::backends::Backends;
use resolution_core::{
    BackendError, HubKey, IdentifierIndex, KeyIds, PaymentConfig, ReferenceLinks,
    RepositoryService, ResolveError, ResolvedKey, Result, SourceIdentifier, TemplateError,
    UrlTemplate,
};
use std::sync::Arc;
use tracing::{debug, trace};
use url::form_urlencoded;

const SOURCE_ID: &str = "source_id";
const OFFER_ID: &str = "offer_id";

/// Decides where a provider wants lookups of its assets sent.
#[derive(Clone)]
pub struct ReferenceLinkResolver {
    index: Arc<dyn IdentifierIndex>,
    repositories: Arc<dyn RepositoryService>,
}

impl ReferenceLinkResolver {
    pub fn new(index: Arc<dyn IdentifierIndex>, repositories: Arc<dyn RepositoryService>) -> Self {
        Self {
            index,
            repositories,
        }
    }

    pub fn from_backends(backends: &Backends) -> Self {
        Self::new(
            Arc::clone(&backends.index),
            Arc::clone(&backends.repositories),
        )
    }

    /// Renders the reference link for `resolved`, or `None` when the provider
    /// has no link for its redirect id type or the asset carries no id of
    /// that type.
    ///
    /// A template without `{source_id}` needs no identifier lookup.
    pub async fn resolve_link(
        &self,
        links: Option<&ReferenceLinks>,
        resolved: &ResolvedKey,
    ) -> Result<Option<String>> {
        let Some((redirect_id_type, raw)) = links.and_then(ReferenceLinks::redirect_template)
        else {
            trace!(hub_key = %resolved.key, "no reference link configured");
            return Ok(None);
        };

        let key = &resolved.key;
        let template = UrlTemplate::parse(raw).map_err(ResolveError::RedirectTemplate)?;
        let fields = key.fields();
        template
            .ensure_known(&known_placeholders(&fields, &[SOURCE_ID]))
            .map_err(ResolveError::RedirectTemplate)?;

        if !template.has_placeholder(SOURCE_ID) {
            return render(&template, fields).map_err(ResolveError::RedirectTemplate);
        }

        let candidates = self.candidates(key, redirect_id_type).await?;
        let Some(source_id) = last_match(&candidates, redirect_id_type) else {
            debug!(
                hub_key = %key,
                redirect_id_type,
                candidates = candidates.len(),
                "no identifier of the redirect type"
            );
            return Ok(None);
        };

        let escaped = escape(source_id);
        let mut values = fields;
        values.push((SOURCE_ID, &escaped));
        render(&template, values).map_err(ResolveError::RedirectTemplate)
    }

    /// Renders the payment link of one offer, or `None` when the asset
    /// carries no id of the payment id type.
    ///
    /// Template problems are the provider's misconfiguration and fail with
    /// [`ResolveError::PaymentLinkMalformed`].
    pub async fn resolve_payment_link(
        &self,
        payment: &PaymentConfig,
        resolved: &ResolvedKey,
        offer_id: &str,
    ) -> Result<Option<String>> {
        match self.payment_link(payment, resolved).await? {
            Some(link) => link.render(&resolved.key, offer_id),
            None => Ok(None),
        }
    }

    /// Binds the payment template to one asset, looking its identifiers up
    /// once for all of the asset's offers. `None` when no template is set.
    pub async fn payment_link(
        &self,
        payment: &PaymentConfig,
        resolved: &ResolvedKey,
    ) -> Result<Option<PaymentLink>> {
        if payment.url_template.is_empty() {
            return Ok(None);
        }

        let key = &resolved.key;
        let template =
            UrlTemplate::parse(&payment.url_template).map_err(ResolveError::PaymentLinkMalformed)?;
        let fields = key.fields();
        template
            .ensure_known(&known_placeholders(&fields, &[SOURCE_ID, OFFER_ID]))
            .map_err(ResolveError::PaymentLinkMalformed)?;

        if !template.has_placeholder(SOURCE_ID) {
            return Ok(Some(PaymentLink {
                template,
                source_id: None,
            }));
        }

        let candidates = match &key.ids {
            KeyIds::S1 {
                repository_id,
                entity_id,
            } => self.repositories.ids_for_asset(repository_id, entity_id).await?,
            KeyIds::S0 { .. } => self.candidates(key, &payment.source_id_type).await?,
        };
        let source_id = last_match(&candidates, &payment.source_id_type).map(escape);
        if source_id.is_none() {
            debug!(
                hub_key = %key,
                source_id_type = %payment.source_id_type,
                "no identifier of the payment type"
            );
        }
        Ok(Some(PaymentLink {
            template,
            source_id,
        }))
    }

    /// External identifiers of the keyed asset, in discovery order.
    async fn candidates(
        &self,
        key: &HubKey,
        redirect_id_type: &str,
    ) -> Result<Vec<SourceIdentifier>> {
        match &key.ids {
            KeyIds::S0 {
                id_type, entity_id, ..
            } if id_type == redirect_id_type => {
                Ok(vec![SourceIdentifier::new(id_type.as_str(), entity_id.as_str())])
            }
            KeyIds::S0 {
                id_type, entity_id, ..
            } => {
                let entries = match self
                    .index
                    .repositories_for_source_id(id_type, entity_id)
                    .await
                {
                    Ok(entries) => entries,
                    Err(BackendError::NotFound { .. }) => Vec::new(),
                    Err(e) => return Err(e.into()),
                };

                let mut candidates = Vec::new();
                for entry in entries {
                    let ids = self
                        .repositories
                        .ids_for_asset(&entry.repository_id, &entry.entity_id)
                        .await?;
                    candidates.extend(ids);
                }
                Ok(candidates)
            }
            KeyIds::S1 {
                repository_id,
                entity_id,
            } => Ok(self
                .repositories
                .ids_for_asset(repository_id, entity_id)
                .await?),
        }
    }
}

/// A payment template bound to one asset, rendered per offer.
#[derive(Debug, Clone)]
pub struct PaymentLink {
    template: UrlTemplate,
    /// The escaped `{source_id}` value, if the asset has one.
    source_id: Option<String>,
}

impl PaymentLink {
    /// `None` when the template needs a source id the asset does not carry.
    pub fn render(&self, key: &HubKey, offer_id: &str) -> Result<Option<String>> {
        let mut values = key.fields();
        values.push((OFFER_ID, offer_id));
        if self.template.has_placeholder(SOURCE_ID) {
            let Some(source_id) = &self.source_id else {
                return Ok(None);
            };
            values.push((SOURCE_ID, source_id.as_str()));
        }
        render(&self.template, values).map_err(ResolveError::PaymentLinkMalformed)
    }
}

fn known_placeholders<'a>(fields: &[(&'a str, &str)], extra: &[&'a str]) -> Vec<&'a str> {
    fields
        .iter()
        .map(|(name, _)| *name)
        .chain(extra.iter().copied())
        .collect()
}

fn render(
    template: &UrlTemplate,
    values: Vec<(&str, &str)>,
) -> std::result::Result<Option<String>, TemplateError> {
    template.render(&values).map(Some)
}

/// Every candidate is inspected; the last one of the wanted type wins.
fn last_match<'a>(candidates: &'a [SourceIdentifier], id_type: &str) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|candidate| candidate.matches_type(id_type))
        .last()
        .map(|candidate| candidate.source_id.as_str())
}

fn escape(source_id: &str) -> String {
    form_urlencoded::byte_serialize(source_id.as_bytes()).collect()
}
