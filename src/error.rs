use thiserror::Error;

/// Result type for legacy migration
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Fatal migration failures. No partial configuration is produced.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("error converting upstreams: could not parse upstream {upstream:?}: {source}")]
    Upstreams {
        upstream: String,
        #[source]
        source: UriParseError,
    },

    #[error("error converting provider: {0}")]
    Provider(#[from] ProviderConversionError),
}

#[derive(Debug, Error)]
pub enum ProviderConversionError {
    #[error("unknown provider type {0:?}")]
    UnknownType(String),
}

/// Why an upstream string could not be split into scheme, host and path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriParseError {
    #[error("missing protocol scheme")]
    MissingScheme,

    #[error("invalid control character in URL")]
    ControlCharacter,

    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,

    #[error("missing ']' in host")]
    MissingBracket,

    #[error("invalid port {0:?} after host")]
    InvalidPort(String),

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    #[error("escaped bytes in {0:?} are not valid UTF-8")]
    InvalidUtf8(String),
}
