use thiserror::Error;

#[derive(Error, Debug)]
pub enum SugarError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid progressbar_length '{0}': expected a column count or a percentage like \"20%\"")]
    InvalidBarLength(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("malformed event on line {line}: {source}")]
    Event {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
