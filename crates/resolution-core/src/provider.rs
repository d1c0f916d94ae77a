use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An organisation that provides assets, as held by the organisation directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_links: Option<ReferenceLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentConfig>,
    /// Directory attributes the resolver does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Provider {
    /// Returns the provider with its website normalized, see [`normalize_website`].
    pub fn normalized(mut self) -> Self {
        self.website = normalize_website(&self.website);
        self
    }
}

/// Where a provider wants lookups of its assets redirected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLinks {
    /// The identifier type redirects are keyed on.
    #[serde(default)]
    pub redirect_id_type: Option<String>,
    /// URL templates by identifier type.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl ReferenceLinks {
    /// The template registered for the redirect id type, if both are set.
    pub fn redirect_template(&self) -> Option<(&str, &str)> {
        let id_type = self
            .redirect_id_type
            .as_deref()
            .filter(|id_type| !id_type.is_empty())?;
        let template = self.links.get(id_type)?;
        Some((id_type, template.as_str()))
    }
}

/// Payment link configuration for a provider's offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_id_type: String,
    #[serde(default, alias = "url", deserialize_with = "null_as_empty")]
    pub url_template: String,
}

/// Prefixes `http://` to a website that carries no scheme.
///
/// Surrounding whitespace is dropped and an empty website stays empty.
pub fn normalize_website(website: &str) -> String {
    let website = website.trim();
    if website.is_empty() || has_scheme(website) {
        website.to_string()
    } else {
        format!("http://{website}")
    }
}

fn has_scheme(url: &str) -> bool {
    url.split_once("://").is_some_and(|(scheme, _)| {
        scheme
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
