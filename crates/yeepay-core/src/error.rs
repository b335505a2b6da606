/// Core SDK errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("failed to encode configuration: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
