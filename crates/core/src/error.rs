#[derive(Debug, thiserror::Error)]
pub enum CaviError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid field: {field} ({reason})")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
    #[error("No groups provided")]
    NoGroups,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),

    #[error("failed to send results: {0}")]
    DeliveryTransport(reqwest::Error),
    #[error("backend rejected results: status={status}, body={body}")]
    DeliveryRejected { status: u16, body: String },

    #[error("calculation capacity exhausted ({limit} in flight)")]
    AtCapacity { limit: usize },
}

impl CaviError {
    /// Whether this error was caused by the caller's request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CaviError::MissingField(_)
                | CaviError::InvalidField { .. }
                | CaviError::NoGroups
                | CaviError::InvalidBody(_)
        )
    }
}

pub type CaviResult<T> = std::result::Result<T, CaviError>;
