use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorItem {
    pub message: String,
    /// The backend service the error came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>, source: Option<&'static str>) -> Self {
        Self {
            status,
            errors: vec![ErrorItem {
                message: message.into(),
                source,
            }],
        }
    }
}
