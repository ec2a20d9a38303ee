//! Catalog errors

use thiserror::Error;

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Missing token or unusable client configuration
    #[error("Catalog configuration error: {0}")]
    Config(String),

    /// Transport failure before an HTTP status was received
    #[error("Catalog request failed: {0}")]
    Network(String),

    /// Non-2xx answer
    #[error("Catalog API error {0}: {1}")]
    Api(u16, String),

    /// Response body did not match the expected shape
    #[error("Failed to parse catalog response: {0}")]
    Parse(String),

    /// No acceptable catalog track for a candidate
    #[error("No catalog match for \"{title}\" by {artist}")]
    ResolutionMiss { title: String, artist: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CatalogError {
    pub fn miss(title: &str, artist: &str) -> Self {
        CatalogError::ResolutionMiss {
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }
}

impl From<CatalogError> for vibelist_common::Error {
    fn from(err: CatalogError) -> Self {
        use vibelist_common::Error;
        match err {
            CatalogError::Config(msg) => Error::Config(msg),
            CatalogError::Network(msg) => Error::Network(msg),
            CatalogError::Api(status, body) => Error::Upstream { status, body },
            CatalogError::Parse(msg) => Error::Internal(msg),
            err @ CatalogError::ResolutionMiss { .. } => Error::InvalidInput(err.to_string()),
            CatalogError::InvalidInput(msg) => Error::InvalidInput(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_upstream() {
        let err: vibelist_common::Error = CatalogError::Api(401, "expired".to_string()).into();
        assert_eq!(
            err,
            vibelist_common::Error::Upstream {
                status: 401,
                body: "expired".to_string()
            }
        );
    }

    #[test]
    fn test_miss_message() {
        let err = CatalogError::miss("Naima", "John Coltrane");
        assert_eq!(err.to_string(), "No catalog match for \"Naima\" by John Coltrane");
    }
}
