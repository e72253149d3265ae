use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum FolioError {
    #[error("Configuration error")]
    #[diagnostic(
        code(folio_core::configuration_error),
        help("Check `{field}` in {config_path}: expected {expected}")
    )]
    ConfigurationError {
        config_path: String,
        field: String,
        expected: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Fixture load failed")]
    #[diagnostic(
        code(folio_core::fixture_load_failed),
        help("Make sure {location} exists and is readable")
    )]
    FixtureLoadFailed {
        location: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Fixture decode failed")]
    #[diagnostic(
        code(folio_core::fixture_decode_failed),
        help("{location} must contain a JSON array of {data_type}")
    )]
    FixtureDecodeFailed {
        location: String,
        data_type: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("Repository feed request failed")]
    #[diagnostic(
        code(folio_core::feed_request_failed),
        help("Check network connectivity to {url}")
    )]
    FeedRequestFailed {
        url: String,
        #[source]
        cause: reqwest::Error,
    },

    #[error("Repository feed returned HTTP {status}")]
    #[diagnostic(
        code(folio_core::feed_status),
        help("The API rejected the request for {url}; unauthenticated calls are rate limited")
    )]
    FeedStatus { url: String, status: u16 },

    #[error("Repository feed decode failed")]
    #[diagnostic(
        code(folio_core::feed_decode_failed),
        help("Response from {url} was not a list of repositories")
    )]
    FeedDecodeFailed {
        url: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid experience period")]
    #[diagnostic(
        code(folio_core::invalid_period),
        help("Expected \"<Mon> <YYYY> – <Mon> <YYYY>\" or \"<Mon> <YYYY> – Present\"")
    )]
    InvalidPeriod {
        #[source_code]
        src: String,
        #[label("{reason}")]
        span: (usize, usize),
        reason: String,
    },

    #[error("Section not found")]
    #[diagnostic(
        code(folio_core::section_not_found),
        help("Registered sections: {}", registered.join(", "))
    )]
    SectionNotFound { id: String, registered: Vec<String> },
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct StringError(pub(crate) String);

// Helper functions for creating common errors with context
impl FolioError {
    pub fn config(
        config_path: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigurationError {
            config_path: config_path.into(),
            field: field.into(),
            expected: expected.into(),
            cause: Box::new(cause),
        }
    }

    pub fn fixture_load(
        location: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::FixtureLoadFailed {
            location: location.into(),
            cause: Box::new(cause),
        }
    }

    /// Point at the offending slice of a period string.
    pub fn invalid_period(
        period: impl Into<String>,
        offset: usize,
        len: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPeriod {
            src: period.into(),
            span: (offset, len),
            reason: reason.into(),
        }
    }

    pub fn section_not_found(id: impl Into<String>, registered: Vec<String>) -> Self {
        Self::SectionNotFound {
            id: id.into(),
            registered,
        }
    }

    pub fn feed_decode(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self::FeedDecodeFailed {
            url: url.into(),
            cause: Box::new(StringError(error.into())),
        }
    }
}
