use thiserror::Error;

/// Errors surfaced by the fetch pipeline.
///
/// Only two kinds exist. Malformed caller input is `InvalidArgument`;
/// failures of the terminal network call are `Transport`, with the source
/// error carried unchanged. Errors produced by a middleware travel through
/// the chain exactly as the middleware returned them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        FetchError::InvalidArgument(reason.into())
    }

    pub(crate) fn transport(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FetchError::Transport(Box::new(source))
    }
}
