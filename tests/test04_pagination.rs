mod common;

use std::sync::Arc;

use common::{MockTransport, numbered_page};
use partiql_middleware::prelude::*;
use rust_decimal::Decimal;

#[test]
fn cursor_walks_all_pages_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::with_pages(vec![
            numbered_page(0..3, Some("A")),
            numbered_page(3..6, Some("B")),
            numbered_page(6..8, None),
        ]));
        let session = Session::new(transport.clone(), SessionConfig::new(10))?;

        let stmt = session.prepare_statement("SELECT * FROM t");
        let mut rows = stmt.execute(&[]).await?.into_rows().unwrap();

        let mut seen = Vec::new();
        while let Some(row) = rows.next_row().await? {
            seen.push(row.get("id").unwrap().as_number().copied().unwrap());
        }
        let expected: Vec<Decimal> = (0..8).map(Decimal::from).collect();
        assert_eq!(seen, expected);
        assert!(!rows.has_next());

        let requests = transport.execute_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].next_token, None);
        assert_eq!(requests[1].next_token, Some("A".into()));
        assert_eq!(requests[2].next_token, Some("B".into()));
        // Continuations carry the original command and parameters.
        assert!(requests.iter().all(|r| r.statement == "SELECT * FROM t"));
        assert!(
            requests
                .iter()
                .all(|r| r.parameters == vec![WireValue::null()])
        );
        Ok::<(), SessionError>(())
    })?;
    Ok(())
}

#[test]
fn limit_stops_continuation_fetches() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        // Three pages scripted, but the limit is satisfied after two.
        let transport = Arc::new(MockTransport::with_pages(vec![
            numbered_page(0..3, Some("A")),
            numbered_page(3..6, Some("B")),
            numbered_page(6..9, Some("C")),
        ]));
        let session = Session::new(transport.clone(), SessionConfig::new(10))?;

        let stmt = session.prepare_statement("SELECT * FROM t LIMIT 4");
        let mut rows = stmt.execute(&[]).await?.into_rows().unwrap();
        assert_eq!(rows.remaining_limit(), Some(1));

        let mut count = 0;
        while rows.next_row().await?.is_some() {
            count += 1;
        }
        // Fetched pages are fully consumed; fetching stops once the
        // remaining limit is spent.
        assert_eq!(count, 6);
        assert!(!rows.has_next());

        let requests = transport.execute_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].limit, Some(4));
        assert_eq!(requests[1].limit, Some(1));
        assert_eq!(requests[1].next_token, Some("A".into()));
        Ok::<(), SessionError>(())
    })?;
    Ok(())
}

#[test]
fn placeholder_limit_comes_from_last_parameter() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::with_pages(vec![numbered_page(0..2, None)]));
        let session = Session::new(transport.clone(), SessionConfig::new(10))?;

        let stmt = session.prepare_statement("SELECT * FROM t WHERE grp = ? LIMIT ?");
        let outcome = stmt
            .execute(&[RowValues::Text("g".into()), RowValues::from(2)])
            .await?;
        let rows = outcome.into_rows().unwrap();
        assert_eq!(rows.remaining_limit(), Some(0));

        let requests = transport.execute_requests();
        assert_eq!(requests[0].limit, Some(2));
        assert_eq!(requests[0].parameters, vec![WireValue::S("g".into())]);
        assert_eq!(requests[0].statement, "SELECT * FROM t WHERE grp = ? ");
        Ok::<(), SessionError>(())
    })?;
    Ok(())
}

#[test]
fn limit_satisfied_by_first_page_fetches_nothing_more() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::with_pages(vec![numbered_page(
            0..5,
            Some("A"),
        )]));
        let session = Session::new(transport.clone(), SessionConfig::new(10))?;

        let stmt = session.prepare_statement("SELECT * FROM t LIMIT 5");
        let mut rows = stmt.execute(&[]).await?.into_rows().unwrap();

        let mut count = 0;
        while rows.next_row().await?.is_some() {
            count += 1;
        }
        assert_eq!(count, 5);
        // The token survives but the spent limit blocks further fetches.
        assert_eq!(transport.execute_requests().len(), 1);
        Ok::<(), SessionError>(())
    })?;
    Ok(())
}

#[test]
fn empty_page_with_token_still_continues() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let transport = Arc::new(MockTransport::with_pages(vec![
            StatementPage {
                items: Vec::new(),
                next_token: Some("A".into()),
            },
            numbered_page(0..1, None),
        ]));
        let session = Session::new(transport.clone(), SessionConfig::new(10))?;

        let stmt = session.prepare_statement("SELECT * FROM t");
        let mut rows = stmt.execute(&[]).await?.into_rows().unwrap();
        assert!(rows.has_next());

        let row = rows.next_row().await?.expect("row from second page");
        assert_eq!(row.get("id").unwrap().as_number(), Some(&Decimal::from(0)));
        assert!(rows.next_row().await?.is_none());
        assert_eq!(transport.execute_requests().len(), 2);
        Ok::<(), SessionError>(())
    })?;
    Ok(())
}
