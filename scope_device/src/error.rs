use scope_traits::SensorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("request timed out")]
    Timeout,
    #[error("connection refused")]
    ConnectionRefused,
    #[error("http status {0}")]
    Status(u16),
    #[error("response has no numeric '{0}' field")]
    MissingField(&'static str),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("tare is not supported by the {0} sensor")]
    Unsupported(SensorKind),
    #[error("transport: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
