use crate::error::{ResolveError, Result};
use crate::provider::Provider;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::fmt::Display;
use url::Url;

/// Characters escaped when writing a key field back into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const S0_SEGMENTS: usize = 5;
const S1_SEGMENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchemaVersion {
    #[serde(rename = "s0")]
    S0,
    #[serde(rename = "s1")]
    S1,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::S0 => "s0",
            SchemaVersion::S1 => "s1",
        }
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The schema-specific part of a hub key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "schema_version")]
pub enum KeyIds {
    /// Names the owning organisation directly.
    #[serde(rename = "s0")]
    S0 {
        organisation_id: String,
        id_type: String,
        entity_id: String,
    },
    /// Names a repository; the organisation is found through it.
    #[serde(rename = "s1")]
    S1 {
        repository_id: String,
        entity_id: String,
    },
}

/// A parsed hub key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubKey {
    /// Scheme and host of the resolver that issued the key.
    pub resolver_id: String,
    pub hub_id: String,
    pub entity_type: String,
    #[serde(flatten)]
    pub ids: KeyIds,
    /// The key as a string, as received or as rendered by [`HubKey::to_url`].
    pub hub_key: String,
}

impl HubKey {
    /// Parses a hub key URL of either schema.
    ///
    /// ```text
    /// {resolver}/s0/{hub_id}/{entity_type}/{organisation_id}/{id_type}/{entity_id}
    /// {resolver}/s1/{hub_id}/{repository_id}/{entity_type}/{entity_id}
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| invalid(format!("{e}")))?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(invalid("missing scheme or host"));
        }

        let mut segments = url
            .path_segments()
            .ok_or_else(|| invalid("missing path"))?
            .map(decode_segment)
            .collect::<Result<Vec<_>>>()?;
        if segments.last().is_some_and(String::is_empty) {
            segments.pop();
        }

        let (schema, rest) = segments
            .split_first()
            .ok_or_else(|| invalid("missing schema version"))?;
        if let Some(position) = rest.iter().position(String::is_empty) {
            return Err(invalid(format!("empty path segment at position {}", position + 2)));
        }

        let (hub_id, entity_type, ids) = match (schema.as_str(), rest) {
            ("s0", [hub_id, entity_type, organisation_id, id_type, entity_id]) => (
                hub_id,
                entity_type,
                KeyIds::S0 {
                    organisation_id: organisation_id.clone(),
                    id_type: id_type.clone(),
                    entity_id: entity_id.clone(),
                },
            ),
            ("s1", [hub_id, repository_id, entity_type, entity_id]) => (
                hub_id,
                entity_type,
                KeyIds::S1 {
                    repository_id: repository_id.clone(),
                    entity_id: entity_id.clone(),
                },
            ),
            ("s0", _) => {
                return Err(invalid(format!(
                    "s0 keys have {S0_SEGMENTS} segments after the schema version, got {}",
                    rest.len()
                )))
            }
            ("s1", _) => {
                return Err(invalid(format!(
                    "s1 keys have {S1_SEGMENTS} segments after the schema version, got {}",
                    rest.len()
                )))
            }
            (other, _) => return Err(invalid(format!("unsupported schema version '{other}'"))),
        };

        Ok(Self {
            resolver_id: origin.ascii_serialization(),
            hub_id: hub_id.clone(),
            entity_type: entity_type.clone(),
            ids,
            hub_key: raw.to_string(),
        })
    }

    /// Builds an s1 key directly from its parts.
    ///
    /// Parts that cannot survive as a URL path segment (empty, `.` or `..`)
    /// are rejected, so that parsing [`to_url`](Self::to_url) gives the key
    /// back.
    pub fn s1(
        resolver_id: impl Into<String>,
        hub_id: impl Into<String>,
        repository_id: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Result<Self> {
        let mut key = Self {
            resolver_id: resolver_id.into().trim_end_matches('/').to_string(),
            hub_id: hub_id.into(),
            entity_type: entity_type.into(),
            ids: KeyIds::S1 {
                repository_id: repository_id.into(),
                entity_id: entity_id.into(),
            },
            hub_key: String::new(),
        };
        for (name, value) in key.fields().into_iter().skip(2) {
            if matches!(value, "" | "." | "..") {
                return Err(invalid(format!("{name} '{value}' is not a path segment")));
            }
        }
        key.hub_key = key.to_url();
        Ok(key)
    }

    pub fn schema_version(&self) -> SchemaVersion {
        match self.ids {
            KeyIds::S0 { .. } => SchemaVersion::S0,
            KeyIds::S1 { .. } => SchemaVersion::S1,
        }
    }

    pub fn entity_id(&self) -> &str {
        match &self.ids {
            KeyIds::S0 { entity_id, .. } | KeyIds::S1 { entity_id, .. } => entity_id,
        }
    }

    /// Renders the canonical key URL.
    pub fn to_url(&self) -> String {
        let parts: Vec<&str> = match &self.ids {
            KeyIds::S0 {
                organisation_id,
                id_type,
                entity_id,
            } => vec![
                &self.hub_id,
                &self.entity_type,
                organisation_id,
                id_type,
                entity_id,
            ],
            KeyIds::S1 {
                repository_id,
                entity_id,
            } => vec![&self.hub_id, repository_id, &self.entity_type, entity_id],
        };

        let mut url = format!("{}/{}", self.resolver_id, self.schema_version());
        for part in parts {
            url.push('/');
            url.extend(utf8_percent_encode(part, SEGMENT));
        }
        url
    }

    /// Key fields by name, as available to URL templates.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("resolver_id", self.resolver_id.as_str()),
            ("schema_version", self.schema_version().as_str()),
            ("hub_id", self.hub_id.as_str()),
            ("entity_type", self.entity_type.as_str()),
        ];
        match &self.ids {
            KeyIds::S0 {
                organisation_id,
                id_type,
                entity_id,
            } => fields.extend([
                ("organisation_id", organisation_id.as_str()),
                ("id_type", id_type.as_str()),
                ("entity_id", entity_id.as_str()),
            ]),
            KeyIds::S1 {
                repository_id,
                entity_id,
            } => fields.extend([
                ("repository_id", repository_id.as_str()),
                ("entity_id", entity_id.as_str()),
            ]),
        }
        fields
    }
}

impl Display for HubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hub_key)
    }
}

/// A hub key together with the provider that owns the entity it names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedKey {
    #[serde(flatten)]
    pub key: HubKey,
    pub provider: Provider,
}

fn decode_segment(segment: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| invalid(format!("path segment '{segment}' is not valid UTF-8: {e}")))
}

fn invalid(message: impl Into<String>) -> ResolveError {
    ResolveError::InvalidHubKey(message.into())
}
