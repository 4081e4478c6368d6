//! The wire seam between the session layer and the concrete database client.
//!
//! The session factory (outside this crate) resolves credentials and regions
//! and injects a ready [`StatementTransport`]. This crate only drives the
//! statement lifecycle over it: single-statement execution with pagination,
//! batch execution, and atomic transaction execution.

use async_trait::async_trait;
use indexmap::IndexMap;
use thiserror::Error;

use crate::wire::WireValue;

/// An error raised by the underlying database client.
///
/// Propagated unchanged through `SessionError::Transport`; this layer does
/// not retry.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A command paired with its already-converted wire parameters, queued for
/// deferred batch or transaction execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStatement {
    /// The statement text
    pub statement: String,
    /// The wire-converted parameters
    pub parameters: Vec<WireValue>,
}

/// One immediate statement-execution request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteStatementRequest {
    /// The statement text, with any trailing limit clause already stripped
    pub statement: String,
    /// The wire-converted parameters; may be empty for ad hoc statements
    pub parameters: Vec<WireValue>,
    /// Row limit, carried as a structured field rather than dialect syntax
    pub limit: Option<i64>,
    /// Continuation token from the previous page, if any
    pub next_token: Option<String>,
}

/// One page of a statement-execution response.
///
/// Items are ordered maps so a row's attribute encounter order survives into
/// positional column order; rows in one page may carry differing attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementPage {
    /// The items of this page
    pub items: Vec<IndexMap<String, WireValue>>,
    /// Continuation token, absent on the final page
    pub next_token: Option<String>,
}

/// Async client contract for the three wire request shapes the session uses.
///
/// Suspension points of the whole crate are exactly these calls; the session
/// layer adds no concurrency of its own. Timeouts, if any, belong to the
/// implementation's own call semantics.
#[async_trait]
pub trait StatementTransport: Send + Sync {
    /// Execute one statement, returning one response page.
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<StatementPage, TransportError>;

    /// Execute a bounded group of non-select statements as one batch request.
    async fn execute_batch(
        &self,
        statements: Vec<PendingStatement>,
    ) -> Result<(), TransportError>;

    /// Execute a group of non-select statements as one atomic transaction.
    async fn execute_transaction(
        &self,
        statements: Vec<PendingStatement>,
    ) -> Result<(), TransportError>;
}

/// Shared transports work too; the session only ever takes `&self`.
#[async_trait]
impl<T: StatementTransport + ?Sized> StatementTransport for std::sync::Arc<T> {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<StatementPage, TransportError> {
        (**self).execute_statement(request).await
    }

    async fn execute_batch(&self, statements: Vec<PendingStatement>) -> Result<(), TransportError> {
        (**self).execute_batch(statements).await
    }

    async fn execute_transaction(
        &self,
        statements: Vec<PendingStatement>,
    ) -> Result<(), TransportError> {
        (**self).execute_transaction(statements).await
    }
}
