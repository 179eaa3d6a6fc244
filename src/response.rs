//! Validation and decoding of EventHub responses

use log::{trace, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::codec::Codec;
use crate::errors::{Error, Result};
use crate::event::Event;

/// The only status any EventHub operation accepts
pub const OK_RESPONSE: &[u16] = &[200];

/// Shapes a response body can be decoded into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    StringList,
    IntList,
    /// ragged: rows may differ in length or be empty
    IntMatrix,
    EventList,
    /// `external_user_id` of each object in an array
    UserIdList,
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    StringList(Vec<String>),
    IntList(Vec<i64>),
    IntMatrix(Vec<Vec<i64>>),
    EventList(Vec<Event>),
    UserIdList(Vec<String>),
}

/// Succeed when `actual` is one of `accepted`
pub fn check_status(actual: u16, accepted: &[u16]) -> Result<()> {
    if accepted.contains(&actual) {
        Ok(())
    } else {
        warn!("rejected response code {} (accepted: {:?})", actual, accepted);
        Err(Error::UnexpectedResponseCode {
            accepted: accepted.to_vec(),
            actual,
        })
    }
}

/// Decode `body` into the requested shape
pub fn decode(codec: &Codec, body: Option<&[u8]>, shape: Shape) -> Result<Decoded> {
    Ok(match shape {
        Shape::StringList => Decoded::StringList(string_list(body)?),
        Shape::IntList => Decoded::IntList(int_list(body)?),
        Shape::IntMatrix => Decoded::IntMatrix(int_matrix(body)?),
        Shape::EventList => Decoded::EventList(event_list(codec, body)?),
        Shape::UserIdList => Decoded::UserIdList(user_id_list(body)?),
    })
}

/// Parse a non-empty JSON body into `D`.
///
/// A missing or empty body is rejected before any parse is attempted. A
/// parse failure, a `null` document, or a document of another shape are all
/// reported as `BadlyFormedResponseBody`.
pub fn parse_body<D: DeserializeOwned>(body: Option<&[u8]>) -> Result<D> {
    let body = match body {
        Some(body) if !body.is_empty() => body,
        Some(_) => return Err(Error::badly_formed("response body was empty")),
        None => return Err(Error::badly_formed("response body was null")),
    };
    trace!("response body: {}", String::from_utf8_lossy(body));
    serde_json::from_slice(body).map_err(|err| Error::badly_formed_by("badly formed response", err))
}

pub fn string_list(body: Option<&[u8]>) -> Result<Vec<String>> {
    parse_body(body)
}

pub fn int_list(body: Option<&[u8]>) -> Result<Vec<i64>> {
    parse_body(body)
}

pub fn int_matrix(body: Option<&[u8]>) -> Result<Vec<Vec<i64>>> {
    parse_body(body)
}

pub fn event_list(codec: &Codec, body: Option<&[u8]>) -> Result<Vec<Event>> {
    let values: Vec<Value> = parse_body(body)?;
    Ok(codec.decode_events(&values)?)
}

#[derive(Deserialize)]
struct UserIdEntry {
    external_user_id: String,
}

/// Extract `external_user_id` from each object, in input order.
///
/// Other fields of the objects are ignored.
pub fn user_id_list(body: Option<&[u8]>) -> Result<Vec<String>> {
    let entries: Vec<UserIdEntry> = parse_body(body)?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.external_user_id)
        .collect())
}

/// Body as text, for endpoints answering with plain text
pub fn text(body: Option<&[u8]>) -> Result<String> {
    let body = body.unwrap_or_default();
    String::from_utf8(body.to_vec())
        .map_err(|err| Error::badly_formed_by("response body is not utf-8", err))
}
