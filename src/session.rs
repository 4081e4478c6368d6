//! Session ownership of the transport, the deferred-statement buffers, and
//! the transaction state machine.
//!
//! A session moves `Idle -> InTransaction -> Idle` via `begin_transaction`
//! and `commit`/`abort`. Statement handles created from one session may run
//! on different threads; each buffer is guarded by its own lock. Callers are
//! expected to serialize begin/commit/abort relative to concurrent statement
//! submission.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::SessionError;
use crate::statement::{PreparedStatement, Statement};
use crate::transport::{PendingStatement, StatementTransport};

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Construction-time session settings supplied by the session factory.
///
/// Everything beyond the batch capacity is carried opaquely: the interface
/// identifier tags downstream metadata and the session params (region and
/// friends) belong to the transport, not to this layer.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    records_in_batch: i64,
    interface_identifier: Option<String>,
    session_params: HashMap<String, String>,
}

impl SessionConfig {
    /// Create a config with the given batch capacity. Validated when the
    /// session is constructed.
    #[must_use]
    pub fn new(records_in_batch: i64) -> Self {
        Self {
            records_in_batch,
            interface_identifier: None,
            session_params: HashMap::new(),
        }
    }

    /// Attach the opaque interface identifier.
    #[must_use]
    pub fn interface_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.interface_identifier = Some(identifier.into());
        self
    }

    /// Attach a pass-through session parameter.
    #[must_use]
    pub fn session_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.session_params.insert(key.into(), value.into());
        self
    }
}

/// Owner of the underlying connection, both deferred buffers, and the
/// transaction flag.
pub struct Session<T: StatementTransport> {
    transport: T,
    records_in_batch: usize,
    interface_identifier: Option<String>,
    session_params: HashMap<String, String>,
    in_transaction: AtomicBool,
    transaction_statements: Mutex<Vec<PendingStatement>>,
    batch_statements: Mutex<Vec<PendingStatement>>,
}

impl<T: StatementTransport> Session<T> {
    /// Create a session over an already-resolved transport.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidBatchSize` when the configured batch
    /// capacity is below 1.
    pub fn new(transport: T, config: SessionConfig) -> Result<Self, SessionError> {
        if config.records_in_batch < 1 {
            return Err(SessionError::InvalidBatchSize(config.records_in_batch));
        }
        debug!(
            records_in_batch = config.records_in_batch,
            "creating session"
        );
        #[allow(clippy::cast_sign_loss)]
        let records_in_batch = config.records_in_batch as usize;
        Ok(Self {
            transport,
            records_in_batch,
            interface_identifier: config.interface_identifier,
            session_params: config.session_params,
            in_transaction: AtomicBool::new(false),
            transaction_statements: Mutex::new(Vec::new()),
            batch_statements: Mutex::new(Vec::new()),
        })
    }

    /// Create an ad hoc statement handle.
    pub fn statement(&self) -> Statement<'_, T> {
        debug!("creating statement");
        Statement::new(self)
    }

    /// Create a prepared statement handle with fixed command text.
    pub fn prepare_statement(&self, command: impl Into<String>) -> PreparedStatement<'_, T> {
        debug!("creating prepared statement");
        PreparedStatement::new(self, command.into())
    }

    /// This session supports transactional bracketing.
    #[must_use]
    pub fn is_transactional(&self) -> bool {
        true
    }

    /// Whether a transaction is currently open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::SeqCst)
    }

    /// Open a transaction. Idempotent; transactions do not nest.
    pub fn begin_transaction(&self) {
        self.in_transaction.store(true, Ordering::SeqCst);
    }

    /// Commit the open transaction.
    ///
    /// Buffered transaction statements go out as one atomic multi-statement
    /// request and are cleared only once that request succeeds, so a failed
    /// commit leaves them queued for a retry or an explicit [`abort`].
    /// A non-empty batch buffer is flushed afterwards, then the transaction
    /// flag is cleared.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the transaction or batch request.
    ///
    /// [`abort`]: Session::abort
    pub async fn commit(&self) -> Result<(), SessionError> {
        debug!("committing transaction");
        let staged: Vec<PendingStatement> =
            lock_or_recover(&self.transaction_statements).clone();
        if !staged.is_empty() {
            self.transport.execute_transaction(staged).await?;
            lock_or_recover(&self.transaction_statements).clear();
        }
        let batched: Vec<PendingStatement> = {
            let mut guard = lock_or_recover(&self.batch_statements);
            guard.drain(..).collect()
        };
        if !batched.is_empty() {
            self.flush_batch(batched).await?;
        }
        self.in_transaction.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Discard both buffers without issuing any request and close the
    /// transaction bracket.
    pub fn abort(&self) {
        debug!("aborting session");
        lock_or_recover(&self.transaction_statements).clear();
        lock_or_recover(&self.batch_statements).clear();
        self.in_transaction.store(false, Ordering::SeqCst);
    }

    /// Release the underlying connection, discarding both buffers without
    /// flushing. An open, uncommitted transaction is silently lost; callers
    /// must commit or abort first.
    pub fn close(self) {
        debug!("closing session");
        drop(self);
    }

    /// The opaque interface identifier supplied at construction.
    #[must_use]
    pub fn interface_identifier(&self) -> Option<&str> {
        self.interface_identifier.as_deref()
    }

    /// A pass-through session parameter supplied at construction.
    #[must_use]
    pub fn session_param(&self, key: &str) -> Option<&str> {
        self.session_params.get(key).map(String::as_str)
    }

    /// The configured batch capacity.
    #[must_use]
    pub fn records_in_batch(&self) -> usize {
        self.records_in_batch
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn queue_transaction_statement(&self, pending: PendingStatement) {
        lock_or_recover(&self.transaction_statements).push(pending);
    }

    /// Append to the batch buffer; reaching the capacity threshold drains the
    /// buffer under its lock and flushes it as one batch request.
    pub(crate) async fn append_batch_statement(
        &self,
        pending: PendingStatement,
    ) -> Result<(), SessionError> {
        let drained: Option<Vec<PendingStatement>> = {
            let mut guard = lock_or_recover(&self.batch_statements);
            guard.push(pending);
            if guard.len() >= self.records_in_batch {
                Some(guard.drain(..).collect())
            } else {
                None
            }
        };
        if let Some(statements) = drained {
            self.flush_batch(statements).await?;
        }
        Ok(())
    }

    // Statements are drained before the request goes out; a transport failure
    // surfaces to the caller but does not re-queue them.
    async fn flush_batch(&self, statements: Vec<PendingStatement>) -> Result<(), SessionError> {
        debug!(statements = statements.len(), "executing batch");
        self.transport.execute_batch(statements).await?;
        Ok(())
    }

    /// Number of statements currently queued for the next commit.
    #[must_use]
    pub fn pending_transaction_len(&self) -> usize {
        lock_or_recover(&self.transaction_statements).len()
    }

    /// Number of statements currently queued in the batch buffer.
    #[must_use]
    pub fn pending_batch_len(&self) -> usize {
        lock_or_recover(&self.batch_statements).len()
    }
}
