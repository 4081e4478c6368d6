//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::conversion::{WireFallback, from_wire, to_wire, to_wire_params, to_wire_with};
pub use crate::cursor::RowCursor;
pub use crate::error::SessionError;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::session::{Session, SessionConfig};
pub use crate::statement::{ExecuteOutcome, PreparedStatement, Statement};
pub use crate::translation::{LimitRewrite, extract_limit};
pub use crate::transport::{
    ExecuteStatementRequest, PendingStatement, StatementPage, StatementTransport, TransportError,
};
pub use crate::types::RowValues;
pub use crate::wire::WireValue;
