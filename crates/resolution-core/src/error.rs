use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Errors surfaced by the resolution core.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Result type for backend port operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// The backend service a call was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Directory,
    Repository,
    Index,
    Query,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Directory => "directory",
            Service::Repository => "repository",
            Service::Index => "index",
            Service::Query => "query",
        }
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{service} returned not found: {message}")]
    NotFound { service: Service, message: String },
    #[error("{service} call failed: {message}")]
    Unexpected {
        service: Service,
        /// HTTP status of the failed call, absent for transport failures.
        status: Option<u16>,
        message: String,
    },
}

impl BackendError {
    pub fn not_found(service: Service, message: impl Into<String>) -> Self {
        Self::NotFound {
            service,
            message: message.into(),
        }
    }

    pub fn unexpected(service: Service, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Unexpected {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn service(&self) -> Service {
        match self {
            BackendError::NotFound { service, .. } | BackendError::Unexpected { service, .. } => {
                *service
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }
}

/// Errors raised while parsing or rendering a URL template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),
    #[error("unbalanced brace at offset {0}")]
    UnbalancedBrace(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Invalid hub key: {0}")]
    InvalidHubKey(String),
    #[error("{message}")]
    UpstreamNotFound { service: Service, message: String },
    #[error("Unexpected error: {message}")]
    UpstreamError {
        service: Service,
        status: Option<u16>,
        message: String,
    },
    #[error("Invalid parameter in redirect URL: {0}")]
    RedirectTemplate(#[source] TemplateError),
    #[error("Malformed payment link: {0}")]
    PaymentLinkMalformed(#[source] TemplateError),
    #[error("hostname provider '{host}' contradicts querystring provider '{param}'")]
    ConflictingProvider { host: String, param: String },
    #[error("unable to find matching asset from provided identifiers")]
    IncompleteQuery,
}

impl ResolveError {
    /// Maps a backend failure, replacing the message of a not-found response
    /// with `not_found_message`.
    pub fn upstream(error: BackendError, not_found_message: &str) -> Self {
        match error {
            BackendError::NotFound { service, .. } => ResolveError::UpstreamNotFound {
                service,
                message: not_found_message.to_string(),
            },
            other => other.into(),
        }
    }

    /// The backend service the error originated from, if any.
    pub fn service(&self) -> Option<Service> {
        match self {
            ResolveError::UpstreamNotFound { service, .. }
            | ResolveError::UpstreamError { service, .. } => Some(*service),
            _ => None,
        }
    }

    /// HTTP status class the error is surfaced with.
    pub fn status(&self) -> u16 {
        match self {
            ResolveError::InvalidHubKey(_)
            | ResolveError::UpstreamNotFound { .. }
            | ResolveError::RedirectTemplate(_) => 404,
            ResolveError::UpstreamError { status, .. } => {
                status.filter(|code| (400..600).contains(code)).unwrap_or(502)
            }
            ResolveError::PaymentLinkMalformed(_) => 500,
            ResolveError::ConflictingProvider { .. } | ResolveError::IncompleteQuery => 400,
        }
    }
}

impl From<BackendError> for ResolveError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::NotFound { service, message } => {
                ResolveError::UpstreamNotFound { service, message }
            }
            BackendError::Unexpected {
                service,
                status,
                message,
            } => ResolveError::UpstreamError {
                service,
                status,
                message,
            },
        }
    }
}
