// Shared across integration test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use partiql_middleware::prelude::*;

/// One wire call observed by the mock transport.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Execute(ExecuteStatementRequest),
    Batch(Vec<PendingStatement>),
    Transaction(Vec<PendingStatement>),
}

/// A scripted transport: serves queued pages in order and records every call.
#[derive(Default)]
pub struct MockTransport {
    pages: Mutex<VecDeque<StatementPage>>,
    calls: Mutex<Vec<RecordedCall>>,
    fail_transactions: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: Vec<StatementPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn fail_transactions(&self) {
        self.fail_transactions.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn execute_requests(&self) -> Vec<ExecuteStatementRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Execute(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn batch_calls(&self) -> Vec<Vec<PendingStatement>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Batch(statements) => Some(statements),
                _ => None,
            })
            .collect()
    }

    pub fn transaction_calls(&self) -> Vec<Vec<PendingStatement>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Transaction(statements) => Some(statements),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl StatementTransport for MockTransport {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<StatementPage, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Execute(request));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::new("no scripted page left"))
    }

    async fn execute_batch(&self, statements: Vec<PendingStatement>) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Batch(statements));
        Ok(())
    }

    async fn execute_transaction(
        &self,
        statements: Vec<PendingStatement>,
    ) -> Result<(), TransportError> {
        if self.fail_transactions.load(Ordering::SeqCst) {
            return Err(TransportError::new("transaction rejected"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Transaction(statements));
        Ok(())
    }
}

/// Build a response item from text attributes.
pub fn text_item(fields: &[(&str, &str)]) -> IndexMap<String, WireValue> {
    fields
        .iter()
        .map(|(name, value)| ((*name).to_string(), WireValue::S((*value).to_string())))
        .collect()
}

/// Build a page of single-attribute items `id = <n>` with an optional token.
pub fn numbered_page(ids: std::ops::Range<i64>, next_token: Option<&str>) -> StatementPage {
    StatementPage {
        items: ids
            .map(|id| {
                IndexMap::from([("id".to_string(), WireValue::N(id.to_string()))])
            })
            .collect(),
        next_token: next_token.map(str::to_string),
    }
}
