use thiserror::Error;

use crate::dns::QueryError;
use crate::domain::DomainError;

/// Why a report could not be started. Once started, a report always completes.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid domain: {0}")]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Client(#[from] QueryError),
}
