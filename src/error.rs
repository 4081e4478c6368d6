use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by the session, statement, and value-conversion layers.
///
/// Transport failures pass through unchanged; retry policy belongs to the
/// transport implementation, not to this crate.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Batch size must be at least 1, got {0}")]
    InvalidBatchSize(i64),

    #[error("Unsupported parameter type: {0}")]
    UnsupportedType(String),

    #[error("Unknown wire value type: {0}")]
    UnknownWireType(String),

    #[error("Select statements inside a transaction are unsupported")]
    UnsupportedInTransaction,

    #[error("Batch select statements are unsupported")]
    UnsupportedInBatch,

    #[error("Batch mode outside of a transaction is not allowed")]
    BatchOutsideTransaction,

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),
}
