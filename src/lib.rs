//! Session-level middleware for document stores that speak a PartiQL-style
//! dialect over a tagged attribute-value wire format.
//!
//! The crate wraps an injected async [`transport::StatementTransport`] with
//! the client-side statement lifecycle: bidirectional value conversion
//! between the generic [`types::RowValues`] model and the wire format,
//! immediate execution with automatic pagination, deferred batched execution
//! under a capacity threshold, and deferred transactional execution.
//!
//! ```rust,no_run
//! use partiql_middleware::prelude::*;
//!
//! # async fn demo<T: StatementTransport>(transport: T) -> Result<(), SessionError> {
//! let session = Session::new(transport, SessionConfig::new(25))?;
//! let stmt = session.prepare_statement("SELECT * FROM users WHERE id = ? LIMIT 10");
//! let mut rows = stmt
//!     .execute(&[RowValues::Text("u-1".into())])
//!     .await?
//!     .into_rows()
//!     .expect("immediate execution outside a transaction");
//! while let Some(row) = rows.next_row().await? {
//!     println!("{:?}", row.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod conversion;
pub mod cursor;
pub mod error;
pub mod prelude;
pub mod results;
pub mod session;
pub mod statement;
pub mod translation;
pub mod transport;
pub mod types;
pub mod wire;

pub use error::SessionError;
pub use session::{Session, SessionConfig};
pub use types::RowValues;
pub use wire::WireValue;
