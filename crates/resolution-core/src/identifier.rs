use serde::{Deserialize, Serialize};

/// One external identifier of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIdentifier {
    pub source_id_type: String,
    pub source_id: String,
}

impl SourceIdentifier {
    pub fn new(source_id_type: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            source_id_type: source_id_type.into(),
            source_id: source_id.into(),
        }
    }

    /// Case-insensitive comparison of the identifier type.
    pub fn matches_type(&self, id_type: &str) -> bool {
        self.source_id_type.to_lowercase() == id_type.to_lowercase()
    }
}

/// A repository holding an entity, as reported by the identifier index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryEntity {
    pub repository_id: String,
    pub entity_id: String,
}

impl RepositoryEntity {
    pub fn new(repository_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            repository_id: repository_id.into(),
            entity_id: entity_id.into(),
        }
    }
}

/// A repository as registered in the organisation directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub organisation_id: String,
    #[serde(default)]
    pub service_location: Option<String>,
}
