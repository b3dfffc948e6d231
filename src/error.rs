use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Fetch error for {device} ({address}): {reason}")]
    Fetch {
        device: String,
        address: String,
        reason: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

/// A single positional field that could not be read.
///
/// Never escapes the decoder: the field falls back to its zero value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldDecodeError {
    #[error("field {index} is missing")]
    Missing { index: usize },

    #[error("field {index} is not numeric: {found}")]
    NotNumeric { index: usize, found: String },

    #[error("field {index} is not an array")]
    NotArray { index: usize },
}

pub type Result<T> = std::result::Result<T, ExporterError>;
