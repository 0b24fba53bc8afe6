use http::StatusCode;
use thiserror::Error;

pub type RouteResult<T> = Result<T, RouteError>;

/// Errors surfaced by route handlers and the response writer.
///
/// `Ended` is not a failure: it is the signal produced by
/// [`Response::end`](crate::http::res::Response::end) and carried out of the
/// handler with `?`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("request processing ended")]
    Ended,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl RouteError {
    pub fn is_ended(&self) -> bool {
        matches!(self, RouteError::Ended)
    }
}

/// Reasons an inbound request could not be read off the wire.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("connection closed")]
    Closed,

    #[error("read timeout")]
    Timeout,

    #[error("request line exceeds {0} bytes")]
    UriTooLong(usize),

    #[error("header line exceeds {0} bytes")]
    HeaderTooLarge(usize),

    #[error("more than {0} headers")]
    TooManyHeaders(usize),

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("request body of {0} bytes is too large")]
    BodyTooLarge(usize),

    #[error("chunked request bodies are not supported")]
    ChunkedNotSupported,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// Status to answer with, `None` when the peer is gone.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Closed | RequestError::Io(_) => None,
            RequestError::Timeout => Some(StatusCode::REQUEST_TIMEOUT),
            RequestError::UriTooLong(_) => Some(StatusCode::URI_TOO_LONG),
            RequestError::HeaderTooLarge(_) | RequestError::TooManyHeaders(_) => {
                Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
            }
            RequestError::Malformed(_) => Some(StatusCode::BAD_REQUEST),
            RequestError::BodyTooLarge(_) => Some(StatusCode::PAYLOAD_TOO_LARGE),
            RequestError::ChunkedNotSupported => Some(StatusCode::NOT_IMPLEMENTED),
        }
    }
}
