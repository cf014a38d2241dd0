use std::time::Duration;

/// Error type returned by this crate.
///
/// Every API failure maps onto exactly one variant. The first four are
/// terminal: repeating the request without changing it cannot succeed.
/// [`WaveError::RateLimited`], [`WaveError::ServerFault`],
/// [`WaveError::Timeout`] and [`WaveError::Network`] are transient and the
/// client retries them up to the configured limit before surfacing them.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WaveError {
    /// Request was rejected as malformed (HTTP 400), or failed client-side
    /// validation before it was sent.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        detail: Option<String>,
    },
    /// Missing or rejected credential (HTTP 401), or no API key could be
    /// resolved at construction time.
    #[error("authentication error: {message}")]
    Authentication {
        message: String,
        detail: Option<String>,
    },
    /// The credential is valid but lacks permission (HTTP 403).
    #[error("authorization error: {message}")]
    Authorization {
        message: String,
        detail: Option<String>,
    },
    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {message}")]
    NotFound {
        message: String,
        detail: Option<String>,
    },
    /// The server throttled the request (HTTP 429).
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        detail: Option<String>,
        /// Server-provided wait hint from the `Retry-After` header.
        retry_after: Option<Duration>,
    },
    /// Transient backend fault (HTTP 500, 502, 503 or 504).
    #[error("server error {status}: {message}")]
    ServerFault {
        status: u16,
        message: String,
        detail: Option<String>,
    },
    /// The attempt did not complete within the configured timeout.
    #[error("request timed out: {message}")]
    Timeout { message: String },
    /// Connection-level failure before a usable response arrived.
    #[error("network error: {message}")]
    Network { message: String },
    /// Any other non-success HTTP status.
    #[error("http error {status}: {message}")]
    Unclassified {
        status: u16,
        message: String,
        detail: Option<String>,
    },
    /// A response or request body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl WaveError {
    /// HTTP status associated with the error, when one was observed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(400),
            Self::Authentication { .. } => Some(401),
            Self::Authorization { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::ServerFault { status, .. } | Self::Unclassified { status, .. } => Some(*status),
            Self::Timeout { .. } | Self::Network { .. } | Self::Decode(_) => None,
        }
    }

    /// True when repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ServerFault { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }

    /// Extra error context sent by the server, when any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation { detail, .. }
            | Self::Authentication { detail, .. }
            | Self::Authorization { detail, .. }
            | Self::NotFound { detail, .. }
            | Self::RateLimited { detail, .. }
            | Self::ServerFault { detail, .. }
            | Self::Unclassified { detail, .. } => detail.as_deref(),
            Self::Timeout { .. } | Self::Network { .. } | Self::Decode(_) => None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: None,
        }
    }
}
