use thiserror::Error;

/// Pointer appended to HTTP failures so callers know where to look up the
/// meaning of a rejected query.
pub const HELP_URL: &str = "https://sdw-wsrest.ecb.europa.eu/help/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdwError {
    /// A caller-supplied argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// The service answered with a non-success status.
    #[error("Request failed with status {status}: {body}\nSee {help} for details.")]
    Http {
        status: u16,
        body: String,
        help: &'static str,
    },

    /// The document did not have the expected SDMX-ML shape.
    #[error("Failed to parse SDMX-ML response: {0}")]
    DataParse(String),

    #[error("Request could not be completed: {0}")]
    Transport(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SdwError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::DataParse(message.into())
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
            help: HELP_URL,
        }
    }
}

pub type Result<T> = std::result::Result<T, SdwError>;
