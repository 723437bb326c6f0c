use thiserror::Error;

/// Failure modes of a marketplace API call.
///
/// Validation drops during financial-history normalization are not errors;
/// they travel as warnings next to the serialized records (see
/// [`crate::editor`]). Everything that crosses the HTTP boundary lands here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error or server is down.")]
    Transport(#[source] reqwest::Error),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Not logged in (HTTP {status}). Run `backr login` first.")]
    Unauthorized { status: u16 },

    #[error("Unexpected response from server: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Backend rejection with the server's own words, or a status fallback
    /// when the error payload carried no message.
    pub fn backend(status: u16, message: Option<String>) -> Self {
        ApiError::Backend {
            status,
            message: message
                .unwrap_or_else(|| format!("Request failed with status {status}")),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
