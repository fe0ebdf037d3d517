use thiserror::Error;

/// Failure modes of a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("API error ({status})")]
    Status { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response shape: {0}")]
    Shape(String),
    #[error("request superseded by a newer load")]
    Cancelled,
}

impl CatalogError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
