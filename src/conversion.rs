//! Value conversion between [`RowValues`] and the tagged wire format.
//!
//! Conversion is recursive over lists, maps, and sets. Values the wire format
//! cannot express are routed through a fallback contract: the fallback either
//! returns `Ok(None)` ("drop this value") or fails. Nested empty sets are
//! dropped because the wire format cannot represent them; a top-level empty
//! set parameter is a hard error.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::error::SessionError;
use crate::types::RowValues;
use crate::wire::WireValue;

/// Fallback contract for values with no wire representation.
///
/// `Ok(None)` drops the value; an error aborts the conversion.
pub type WireFallback = dyn Fn(&RowValues) -> Result<Option<WireValue>, SessionError>;

fn kind_name(value: &RowValues) -> &'static str {
    match value {
        RowValues::Null => "null",
        RowValues::Text(_) => "text",
        RowValues::Number(_) => "number",
        RowValues::Bool(_) => "bool",
        RowValues::Blob(_) => "blob",
        RowValues::Timestamp(_) => "timestamp",
        RowValues::List(_) => "list",
        RowValues::Map(_) => "map",
        RowValues::Set(_) => "set",
    }
}

fn is_empty_set(value: &RowValues) -> bool {
    matches!(value, RowValues::Set(elements) if elements.is_empty())
}

/// Convert a value to its wire form. An empty set at any depth yields
/// `Ok(None)`; the top-level rejection applied to statement parameters lives
/// in [`to_wire_params`].
///
/// # Errors
///
/// Returns `SessionError::UnsupportedType` for sets of mixed or unsupported
/// element kinds.
pub fn to_wire(value: &RowValues) -> Result<Option<WireValue>, SessionError> {
    to_wire_with(value, &nested_fallback)
}

fn nested_fallback(value: &RowValues) -> Result<Option<WireValue>, SessionError> {
    if is_empty_set(value) {
        return Ok(None);
    }
    Err(unsupported(value))
}

fn unsupported(value: &RowValues) -> SessionError {
    match value {
        RowValues::Set(elements) => match elements.first() {
            Some(first) => SessionError::UnsupportedType(format!(
                "set with elements of kind {}",
                kind_name(first)
            )),
            None => SessionError::UnsupportedType("empty set".to_string()),
        },
        other => SessionError::UnsupportedType(kind_name(other).to_string()),
    }
}

/// Convert a value to its wire form with a caller-supplied fallback for
/// values the wire format cannot express.
///
/// # Errors
///
/// Propagates any error raised by the fallback.
pub fn to_wire_with(
    value: &RowValues,
    fallback: &WireFallback,
) -> Result<Option<WireValue>, SessionError> {
    let wire = match value {
        RowValues::Null => WireValue::null(),
        RowValues::Text(s) => WireValue::S(s.clone()),
        RowValues::Number(n) => WireValue::N(n.to_string()),
        RowValues::Bool(b) => WireValue::Bool(*b),
        RowValues::Blob(bytes) => WireValue::B(BASE64.encode(bytes)),
        RowValues::Timestamp(dt) => {
            // Represent as text in the same shape the row accessors parse
            WireValue::S(dt.format("%F %T%.f").to_string())
        }
        RowValues::List(elements) => {
            let mut converted = Vec::with_capacity(elements.len());
            for element in elements {
                if let Some(wire) = to_wire_with(element, fallback)?
                    && !wire.is_empty()
                {
                    converted.push(wire);
                }
            }
            WireValue::L(converted)
        }
        RowValues::Map(entries) => {
            let mut converted = IndexMap::with_capacity(entries.len());
            for (key, element) in entries {
                if let Some(wire) = to_wire_with(element, fallback)?
                    && !wire.is_empty()
                {
                    converted.insert(key.clone(), wire);
                }
            }
            WireValue::M(converted)
        }
        RowValues::Set(elements) => return set_to_wire(value, elements, fallback),
    };
    Ok(Some(wire))
}

/// Sets dispatch on the kind of their first element. An empty set or a set of
/// mixed/unsupported element kinds goes through the fallback.
fn set_to_wire(
    set: &RowValues,
    elements: &[RowValues],
    fallback: &WireFallback,
) -> Result<Option<WireValue>, SessionError> {
    let Some(first) = elements.first() else {
        return fallback(set);
    };
    let wire = match first {
        RowValues::Text(_) => {
            let mut members = Vec::with_capacity(elements.len());
            for element in elements {
                match element.as_text() {
                    Some(s) => members.push(s.to_string()),
                    None => return fallback(set),
                }
            }
            WireValue::Ss(members)
        }
        RowValues::Number(_) => {
            let mut members = Vec::with_capacity(elements.len());
            for element in elements {
                match element.as_number() {
                    Some(n) => members.push(n.to_string()),
                    None => return fallback(set),
                }
            }
            WireValue::Ns(members)
        }
        RowValues::Blob(_) => {
            let mut members = Vec::with_capacity(elements.len());
            for element in elements {
                match element.as_blob() {
                    Some(bytes) => members.push(BASE64.encode(bytes)),
                    None => return fallback(set),
                }
            }
            WireValue::Bs(members)
        }
        RowValues::Timestamp(_) => {
            let mut members = Vec::with_capacity(elements.len());
            for element in elements {
                match element {
                    RowValues::Timestamp(dt) => {
                        members.push(dt.format("%F %T%.f").to_string());
                    }
                    _ => return fallback(set),
                }
            }
            WireValue::Ss(members)
        }
        _ => return fallback(set),
    };
    Ok(Some(wire))
}

/// Convert a wire value back to a [`RowValues`].
///
/// # Errors
///
/// Returns `SessionError::UnknownWireType` for the unpopulated sentinel and
/// `SessionError::ParameterError` for malformed number or base64 payloads.
pub fn from_wire(value: &WireValue) -> Result<RowValues, SessionError> {
    let parsed = match value {
        WireValue::S(s) => RowValues::Text(s.clone()),
        WireValue::N(n) => RowValues::Number(parse_decimal(n)?),
        WireValue::B(b) => RowValues::Blob(decode_base64(b)?),
        WireValue::Bool(b) => RowValues::Bool(*b),
        WireValue::Null(_) => RowValues::Null,
        WireValue::L(elements) => {
            let mut parsed = Vec::with_capacity(elements.len());
            for element in elements {
                parsed.push(from_wire(element)?);
            }
            RowValues::List(parsed)
        }
        WireValue::M(entries) => {
            let mut parsed = IndexMap::with_capacity(entries.len());
            for (key, element) in entries {
                parsed.insert(key.clone(), from_wire(element)?);
            }
            RowValues::Map(parsed)
        }
        WireValue::Ss(members) => RowValues::Set(
            members
                .iter()
                .map(|s| RowValues::Text(s.clone()))
                .collect(),
        ),
        WireValue::Ns(members) => {
            let mut parsed = Vec::with_capacity(members.len());
            for member in members {
                parsed.push(RowValues::Number(parse_decimal(member)?));
            }
            RowValues::Set(parsed)
        }
        WireValue::Bs(members) => {
            let mut parsed = Vec::with_capacity(members.len());
            for member in members {
                parsed.push(RowValues::Blob(decode_base64(member)?));
            }
            RowValues::Set(parsed)
        }
        WireValue::Empty => {
            return Err(SessionError::UnknownWireType(
                "attribute value with no populated field".to_string(),
            ));
        }
    };
    Ok(parsed)
}

fn parse_decimal(text: &str) -> Result<Decimal, SessionError> {
    text.parse::<Decimal>()
        .map_err(|e| SessionError::ParameterError(format!("invalid decimal '{text}': {e}")))
}

fn decode_base64(text: &str) -> Result<Vec<u8>, SessionError> {
    BASE64
        .decode(text)
        .map_err(|e| SessionError::ParameterError(format!("invalid base64 payload: {e}")))
}

/// Convert a statement's parameter list to wire form.
///
/// An empty input yields a single wire null, since the dialect requires at
/// least one placeholder value for a zero-argument call. A top-level empty
/// set is a hard error rather than a silent drop: a caller explicitly binding
/// an empty set is almost certainly a mistake, not a skippable field.
///
/// # Errors
///
/// Returns `SessionError::UnsupportedType` for empty sets and for sets of
/// mixed or unsupported element kinds.
pub fn to_wire_params(params: &[RowValues]) -> Result<Vec<WireValue>, SessionError> {
    if params.is_empty() {
        return Ok(vec![WireValue::null()]);
    }
    let mut converted = Vec::with_capacity(params.len());
    for param in params {
        // The rejection applies to the parameter itself only; anything
        // nested below it converts with the usual dropping rules.
        if is_empty_set(param) {
            return Err(SessionError::UnsupportedType(
                "empty set as a top-level parameter".to_string(),
            ));
        }
        if let Some(wire) = to_wire(param)?
            && !wire.is_empty()
        {
            converted.push(wire);
        }
    }
    Ok(converted)
}
