// src/error.rs

use thiserror::Error;

/// Failures while resolving or building the API client.
///
/// Request-time failures are not represented here: they surface as
/// `reqwest::Error` straight from the request builders.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no API base URL configured and no origin available from the host environment")]
    MissingBaseUrl,

    #[error("invalid origin location {location:?}: {source}")]
    InvalidOrigin {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
