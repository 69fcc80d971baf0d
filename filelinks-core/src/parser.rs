//! Element parser: batch body to typed parameter sets

use serde_json::Value;

use crate::decode::{json_kind, ElementDecoder};
use crate::entities::FileLinkParams;
use crate::error::{DecodeError, ItemErrors, ParseError};

/// Path of the items collection inside the batch body.
pub const ELEMENTS_PATH: &str = "_embedded/elements";

/// Outcome of decoding one element. A rejected element keeps its slot so the
/// batch can still report it in input order.
pub type ParsedElement = Result<FileLinkParams, ItemErrors>;

/// Parse the batch body into one entry per submitted element.
///
/// Structural problems with the collection itself abort with a [`ParseError`].
/// Elements the decoder rejects become `Err` entries; an element the decoder
/// cannot read at all aborts with [`ParseError::Undecodable`].
pub fn parse_elements<D>(body: &Value, decoder: &D) -> Result<Vec<ParsedElement>, ParseError>
where
    D: ElementDecoder + ?Sized,
{
    locate_elements(body)?
        .iter()
        .enumerate()
        .map(|(index, element)| match decoder.decode(element) {
            Ok(params) => Ok(Ok(params)),
            Err(DecodeError::Invalid(errors)) => Ok(Err(errors)),
            Err(DecodeError::Unreadable { reason }) => {
                Err(ParseError::Undecodable { index, reason })
            }
        })
        .collect()
}

fn locate_elements(body: &Value) -> Result<&[Value], ParseError> {
    let pointer = format!("/{}", ELEMENTS_PATH);
    match body.pointer(&pointer) {
        Some(Value::Array(elements)) if !elements.is_empty() => Ok(elements.as_slice()),
        None => Err(missing_collection()),
        Some(value) if is_blank(value) => Err(missing_collection()),
        Some(value) => Err(ParseError::InvalidCollectionType {
            path: ELEMENTS_PATH.to_string(),
            expected: "array".to_string(),
            actual: json_kind(value).to_string(),
        }),
    }
}

fn missing_collection() -> ParseError {
    ParseError::MissingCollection {
        path: ELEMENTS_PATH.to_string(),
    }
}

/// Null, false, whitespace-only strings and empty containers count as absent.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}
