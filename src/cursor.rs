//! Lazy, forward-only iteration over a statement's response pages.
//!
//! The cursor is an explicit continuation state: current page, position,
//! original command and parameters for re-issue, stored continuation token,
//! and a remaining client-side row limit. Advancing past the current page
//! re-issues the request with the token; the remaining limit is decremented
//! by each new page and fetching stops once it reaches zero or below.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::conversion::from_wire;
use crate::error::SessionError;
use crate::results::{CustomDbRow, ResultSet};
use crate::session::Session;
use crate::transport::{ExecuteStatementRequest, StatementPage, StatementTransport};
use crate::wire::WireValue;

/// A pull-based cursor over paged statement results.
pub struct RowCursor<'a, T: StatementTransport> {
    session: &'a Session<T>,
    statement: String,
    parameters: Vec<WireValue>,
    items: std::vec::IntoIter<IndexMap<String, WireValue>>,
    next_token: Option<String>,
    remaining: Option<i64>,
}

impl<'a, T: StatementTransport> RowCursor<'a, T> {
    pub(crate) fn new(
        session: &'a Session<T>,
        statement: String,
        parameters: Vec<WireValue>,
        page: StatementPage,
        remaining: Option<i64>,
    ) -> Self {
        Self {
            session,
            statement,
            parameters,
            items: page.items.into_iter(),
            next_token: page.next_token,
            remaining,
        }
    }

    /// Whether another row can be produced without exhausting the result:
    /// true while the current page has unconsumed rows, or a continuation
    /// token exists and the remaining limit (if any) is positive.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.items.len() > 0 || self.should_fetch_next()
    }

    /// The remaining client-side row limit, if one was set.
    #[must_use]
    pub fn remaining_limit(&self) -> Option<i64> {
        self.remaining
    }

    fn should_fetch_next(&self) -> bool {
        self.next_token.is_some() && self.remaining.is_none_or(|remaining| remaining > 0)
    }

    /// Produce the next row, re-issuing a continuation request when the
    /// current page is exhausted. Returns `Ok(None)` once the result is
    /// exhausted (callers should check [`has_next`] first).
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the continuation request and value
    /// conversion errors from row translation.
    ///
    /// [`has_next`]: RowCursor::has_next
    pub async fn next_row(&mut self) -> Result<Option<CustomDbRow>, SessionError> {
        loop {
            if let Some(item) = self.items.next() {
                return Ok(Some(translate(item)?));
            }
            if !self.should_fetch_next() {
                return Ok(None);
            }
            let request = ExecuteStatementRequest {
                statement: self.statement.clone(),
                parameters: self.parameters.clone(),
                limit: self.remaining,
                next_token: self.next_token.clone(),
            };
            let page = self.session.transport().execute_statement(request).await?;
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= page.items.len() as i64;
            }
            self.next_token = page.next_token;
            self.items = page.items.into_iter();
        }
    }

    /// Drain every remaining row into a materialized [`ResultSet`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`RowCursor::next_row`].
    pub async fn collect_remaining(&mut self) -> Result<ResultSet, SessionError> {
        let mut result_set = ResultSet::with_capacity(self.items.len());
        while let Some(row) = self.next_row().await? {
            result_set.add_row(row);
        }
        Ok(result_set)
    }
}

// Each item may carry a different attribute set; encounter order becomes
// positional column order.
fn translate(item: IndexMap<String, WireValue>) -> Result<CustomDbRow, SessionError> {
    let mut column_names = Vec::with_capacity(item.len());
    let mut values = Vec::with_capacity(item.len());
    for (name, value) in item {
        values.push(from_wire(&value)?);
        column_names.push(name);
    }
    Ok(CustomDbRow::new(Arc::new(column_names), values))
}
