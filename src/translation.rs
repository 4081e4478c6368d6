//! Statement translation between the caller's dialect and the wire calls.
//!
//! The dialect lets callers write a trailing `LIMIT` clause, but the wire
//! protocol takes the limit as a structured request field instead of
//! statement syntax. [`extract_limit`] separates the two: it strips the
//! clause, resolves a `?` placeholder against the tail of the parameter
//! list, and hands back an immutable triple.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SessionError;
use crate::wire::WireValue;

static LIMIT_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(.*)\blimit\b\s*(\d+|\?)\s*$").expect("limit clause pattern")
});

/// A statement with its trailing limit clause separated out.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitRewrite {
    /// Statement text with the limit clause stripped
    pub statement: String,
    /// The parsed row limit, if a clause matched
    pub limit: Option<i64>,
    /// The parameter list, minus a consumed limit placeholder
    pub parameters: Vec<WireValue>,
}

/// Extract a trailing `LIMIT <n>` or `LIMIT ?` clause (case-insensitive,
/// anchored to the end of the statement).
///
/// For `LIMIT ?` the limit is taken from the last parameter, which must be a
/// numeric wire value; it is removed from the returned parameter list.
///
/// # Errors
///
/// Returns `SessionError::ParameterError` when a `?` placeholder has no
/// parameter to bind to, or the bound parameter is not a whole number.
pub fn extract_limit(
    statement: &str,
    parameters: Vec<WireValue>,
) -> Result<LimitRewrite, SessionError> {
    let mut parameters = parameters;
    let Some(captures) = LIMIT_CLAUSE.captures(statement) else {
        return Ok(LimitRewrite {
            statement: statement.to_string(),
            limit: None,
            parameters,
        });
    };

    let body = captures
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let token = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let limit_text = if token == "?" {
        let Some(bound) = parameters.pop() else {
            return Err(SessionError::ParameterError(
                "limit placeholder has no bound parameter".to_string(),
            ));
        };
        match bound {
            WireValue::N(n) => n,
            other => {
                return Err(SessionError::ParameterError(format!(
                    "limit placeholder must be bound to a number, got {}",
                    other.tag()
                )));
            }
        }
    } else {
        token.to_string()
    };

    let limit = limit_text.parse::<i64>().map_err(|e| {
        SessionError::ParameterError(format!("invalid limit value '{limit_text}': {e}"))
    })?;

    Ok(LimitRewrite {
        statement: body,
        limit: Some(limit),
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_literal_limit() {
        let rewrite = extract_limit("SELECT * FROM t LIMIT 10", Vec::new()).unwrap();
        assert_eq!(rewrite.statement, "SELECT * FROM t ");
        assert_eq!(rewrite.limit, Some(10));
        assert!(rewrite.parameters.is_empty());
    }

    #[test]
    fn extracts_placeholder_limit_from_last_param() {
        let params = vec![WireValue::S("x".into()), WireValue::N("5".into())];
        let rewrite = extract_limit("SELECT * FROM t LIMIT ?", params).unwrap();
        assert_eq!(rewrite.limit, Some(5));
        assert_eq!(rewrite.parameters, vec![WireValue::S("x".into())]);
    }

    #[test]
    fn leaves_statements_without_limit_alone() {
        let params = vec![WireValue::N("5".into())];
        let rewrite = extract_limit("SELECT * FROM t WHERE id = ?", params.clone()).unwrap();
        assert_eq!(rewrite.statement, "SELECT * FROM t WHERE id = ?");
        assert_eq!(rewrite.limit, None);
        assert_eq!(rewrite.parameters, params);
    }

    #[test]
    fn matches_case_insensitively_with_trailing_whitespace() {
        let rewrite = extract_limit("select * from t limit 3  ", Vec::new()).unwrap();
        assert_eq!(rewrite.statement, "select * from t ");
        assert_eq!(rewrite.limit, Some(3));
    }

    #[test]
    fn ignores_limit_like_identifiers() {
        let rewrite = extract_limit("SELECT limit10 FROM t", Vec::new()).unwrap();
        assert_eq!(rewrite.limit, None);
    }

    #[test]
    fn placeholder_without_parameter_fails() {
        let err = extract_limit("SELECT * FROM t LIMIT ?", Vec::new()).unwrap_err();
        assert!(matches!(err, SessionError::ParameterError(_)));
    }

    #[test]
    fn placeholder_bound_to_text_fails() {
        let params = vec![WireValue::S("ten".into())];
        let err = extract_limit("SELECT * FROM t LIMIT ?", params).unwrap_err();
        assert!(matches!(err, SessionError::ParameterError(_)));
    }
}
