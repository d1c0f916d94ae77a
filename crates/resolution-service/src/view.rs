use resolution_core::{Provider, ResolveError, ResolvedKey};
use serde::Serialize;

/// What an entry point decided to do with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectDecision {
    Redirect(String),
    Render { view: View, format: ResponseFormat },
    /// More than one provider licenses the requested asset.
    Disambiguate(Disambiguation),
    NotFound,
    Error(ResolveError),
}

impl RedirectDecision {
    pub fn render(view: View, want_json: bool) -> Self {
        RedirectDecision::Render {
            view,
            format: ResponseFormat::from_flag(want_json),
        }
    }
}

impl From<ResolveError> for RedirectDecision {
    fn from(error: ResolveError) -> Self {
        RedirectDecision::Error(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn from_flag(want_json: bool) -> Self {
        if want_json {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum View {
    Asset(AssetView),
    HubKey(ResolvedKey),
    /// A provider's landing page.
    Provider(Provider),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetView {
    pub provider: Provider,
    pub assets: Vec<AssetIdView>,
    pub description: String,
    pub offers: Vec<OfferView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetIdView {
    pub id: String,
    #[serde(rename = "idType")]
    pub id_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferView {
    pub title: String,
    pub description: String,
    pub payment_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disambiguation {
    pub providers: Vec<Provider>,
    pub id_type: String,
    pub asset_id: String,
}
