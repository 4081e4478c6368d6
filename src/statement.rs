//! Statement handles and the mode-dispatching executor.
//!
//! A statement runs in exactly one of three modes: immediate execution with
//! automatic pagination, deferred transactional execution, or deferred batch
//! execution. Which mode applies follows from the session's transaction
//! state and the call used; read statements are rejected in both deferred
//! modes because the dialect cannot execute them there.

use std::fmt;

use tracing::debug;

use crate::conversion::to_wire_params;
use crate::cursor::RowCursor;
use crate::error::SessionError;
use crate::session::Session;
use crate::translation::extract_limit;
use crate::transport::{ExecuteStatementRequest, PendingStatement, StatementTransport};
use crate::types::RowValues;
use crate::wire::WireValue;

fn is_select(command: &str) -> bool {
    command
        .as_bytes()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"select"))
}

/// The outcome of an `execute` call.
///
/// Outside a transaction the statement ran immediately and rows stream from
/// [`ExecuteOutcome::Rows`]. Inside a transaction the statement was only
/// queued; nothing ran yet, signaled by the `-1` row-count sentinel.
pub enum ExecuteOutcome<'a, T: StatementTransport> {
    /// Immediate execution: a cursor over the response pages
    Rows(RowCursor<'a, T>),
    /// Deferred execution: the statement is queued until commit
    Queued,
}

impl<'a, T: StatementTransport> ExecuteOutcome<'a, T> {
    /// Row-count sentinel meaning "not yet executed".
    pub const ROWS_NOT_EXECUTED: i64 = -1;

    /// `-1` for a queued statement; immediate executions report no affected
    /// row count, only result rows.
    #[must_use]
    pub fn rows_affected(&self) -> i64 {
        match self {
            ExecuteOutcome::Rows(_) => 0,
            ExecuteOutcome::Queued => Self::ROWS_NOT_EXECUTED,
        }
    }

    #[must_use]
    pub fn is_queued(&self) -> bool {
        matches!(self, ExecuteOutcome::Queued)
    }

    /// The row cursor, for immediate executions.
    #[must_use]
    pub fn into_rows(self) -> Option<RowCursor<'a, T>> {
        match self {
            ExecuteOutcome::Rows(cursor) => Some(cursor),
            ExecuteOutcome::Queued => None,
        }
    }
}

// Manual impl: the cursor holds a live transport borrow and has no useful
// Debug form of its own.
impl<T: StatementTransport> fmt::Debug for ExecuteOutcome<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteOutcome::Rows(_) => f.write_str("Rows(..)"),
            ExecuteOutcome::Queued => f.write_str("Queued"),
        }
    }
}

async fn execute_command<'a, T: StatementTransport>(
    session: &'a Session<T>,
    command: &str,
    parameters: Vec<WireValue>,
) -> Result<ExecuteOutcome<'a, T>, SessionError> {
    debug!(command, "executing statement");
    if session.in_transaction() {
        if is_select(command) {
            return Err(SessionError::UnsupportedInTransaction);
        }
        session.queue_transaction_statement(PendingStatement {
            statement: command.to_string(),
            parameters,
        });
        return Ok(ExecuteOutcome::Queued);
    }

    let rewrite = extract_limit(command, parameters)?;
    let request = ExecuteStatementRequest {
        statement: rewrite.statement.clone(),
        parameters: rewrite.parameters.clone(),
        limit: rewrite.limit,
        next_token: None,
    };
    let page = session.transport().execute_statement(request).await?;
    let remaining = rewrite.limit.map(|limit| limit - page.items.len() as i64);
    Ok(ExecuteOutcome::Rows(RowCursor::new(
        session,
        rewrite.statement,
        rewrite.parameters,
        page,
        remaining,
    )))
}

async fn batch_command<T: StatementTransport>(
    session: &Session<T>,
    command: &str,
    parameters: Vec<WireValue>,
) -> Result<(), SessionError> {
    debug!(command, "queueing batch statement");
    if !session.in_transaction() {
        return Err(SessionError::BatchOutsideTransaction);
    }
    if is_select(command) {
        return Err(SessionError::UnsupportedInBatch);
    }
    session
        .append_batch_statement(PendingStatement {
            statement: command.to_string(),
            parameters,
        })
        .await
}

/// An ad hoc statement handle: the command text is supplied per call and no
/// parameters are bound.
pub struct Statement<'a, T: StatementTransport> {
    session: &'a Session<T>,
}

impl<'a, T: StatementTransport> Statement<'a, T> {
    pub(crate) fn new(session: &'a Session<T>) -> Self {
        Self { session }
    }

    /// Execute a command in the mode implied by the session state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnsupportedInTransaction` for a select inside a
    /// transaction; propagates limit-rewrite and transport errors.
    pub async fn execute(&self, command: &str) -> Result<ExecuteOutcome<'a, T>, SessionError> {
        execute_command(self.session, command, Vec::new()).await
    }

    /// Queue a command into the batch buffer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BatchOutsideTransaction` when no transaction is
    /// open, `SessionError::UnsupportedInBatch` for selects, and propagates
    /// transport errors from a threshold flush.
    pub async fn batch(&self, command: &str) -> Result<(), SessionError> {
        batch_command(self.session, command, Vec::new()).await
    }
}

/// A prepared statement handle: command text fixed at creation, parameters
/// supplied per call and converted through the value codec.
pub struct PreparedStatement<'a, T: StatementTransport> {
    session: &'a Session<T>,
    command: String,
}

impl<'a, T: StatementTransport> PreparedStatement<'a, T> {
    pub(crate) fn new(session: &'a Session<T>, command: String) -> Self {
        Self { session, command }
    }

    /// The fixed command text.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Execute with the given parameters in the mode implied by the session
    /// state.
    ///
    /// # Errors
    ///
    /// Returns conversion errors from the value codec (including the
    /// top-level empty-set rejection), mode-legality errors, and transport
    /// errors.
    pub async fn execute(
        &self,
        params: &[RowValues],
    ) -> Result<ExecuteOutcome<'a, T>, SessionError> {
        let parameters = to_wire_params(params)?;
        execute_command(self.session, &self.command, parameters).await
    }

    /// Queue this statement with the given parameters into the batch buffer.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`PreparedStatement::execute`], plus
    /// `SessionError::BatchOutsideTransaction` when no transaction is open.
    pub async fn batch(&self, params: &[RowValues]) -> Result<(), SessionError> {
        let parameters = to_wire_params(params)?;
        batch_command(self.session, &self.command, parameters).await
    }
}
