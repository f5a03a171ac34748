use thiserror::Error;

use crate::usecase::ports::gateway::GatewayError;

/// Input that fails a precondition; reported before any gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please enter a region name")]
    EmptyName,
    #[error("region name must be at least 2 characters")]
    NameTooShort,
    #[error("region \"{0}\" already exists")]
    DuplicateRegion(String),
    #[error("delivery prices must be zero or positive")]
    NegativePrice,
    #[error("invalid file: no delivery price table found")]
    MissingPriceTable,
    #[error("invalid file: {0}")]
    MalformedDocument(String),
    #[error("region \"{0}\" was not found")]
    UnknownRegion(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
