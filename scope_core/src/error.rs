use thiserror::Error;

/// Classified failure of a single poll tick.
///
/// `Display` is the stable, operator-facing message shown as "Last Error".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Connection timeout")]
    Timeout,
    #[error("Connection refused - check device IP")]
    ConnectionRefused,
    #[error("HTTP Error: {0}")]
    Http(u16),
    /// Device answered with a value outside the valid domain (negative,
    /// missing or non-finite).
    #[error("Invalid sensor reading ({field} < 0)")]
    InvalidReading { field: &'static str },
    #[error("Error: {0}")]
    Other(String),
}

impl PollError {
    /// Short machine-friendly name of the classification.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::ConnectionRefused => "ConnectionRefused",
            Self::Http(_) => "HttpError",
            Self::InvalidReading { .. } => "InvalidReading",
            Self::Other(_) => "OtherError",
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum ScopeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("poll failed: {0}")]
    Poll(#[from] PollError),
    #[error("tare failed: {0}")]
    Tare(PollError),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing sensor kind")]
    MissingKind,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
