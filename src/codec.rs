//! Conversion between `Event` and its JSON wire object
//!
//! ```text
//! {
//!   "event_type": "pageview",
//!   "external_user_id": "someone@example.com",
//!   "date": "20141122",
//!   "page": "home"
//! }
//! ```
//!
//! Any of the three reserved keys may be absent. Every other key is a flat
//! string property.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::errors::Error as HubError;
use crate::event::{Event, DATE_KEY, EVENT_TYPE_KEY, EXTERNAL_USER_ID_KEY};

/// Wire format of every date sent to or received from EventHub
pub const EVENTHUB_DATE_FORMAT: &str = "%Y%m%d";

/// Reasons a JSON value cannot become an `Event`
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected a json object, found {0}")]
    NotAnObject(&'static str),
    #[error("value of `{key}` is {kind}, expected a string, number or boolean")]
    UnsupportedValue { key: String, kind: &'static str },
    #[error("`{input}` is not a date in the form {format}")]
    InvalidDate { input: String, format: &'static str },
}

impl From<DecodeError> for HubError {
    fn from(err: DecodeError) -> Self {
        HubError::badly_formed_by("could not decode event", err)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Immutable encoding settings
///
/// Built once by the client and passed to every encode/decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    date_format: &'static str,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    pub fn new() -> Self {
        Self {
            date_format: EVENTHUB_DATE_FORMAT,
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_format).to_string()
    }

    /// Parse a wire date.
    ///
    /// Only the canonical form is accepted: `20141122` parses, while
    /// `2014112` or `2014-11-22` do not.
    pub fn parse_date(&self, input: &str) -> Result<NaiveDate, DecodeError> {
        let invalid = || DecodeError::InvalidDate {
            input: input.to_owned(),
            format: self.date_format,
        };
        let date = NaiveDate::parse_from_str(input, self.date_format).map_err(|_| invalid())?;
        if self.format_date(date) != input {
            return Err(invalid());
        }
        Ok(date)
    }

    /// Encode an event as a flat JSON object.
    ///
    /// Unset typed fields are omitted. Properties follow the typed fields.
    pub fn encode_event(&self, event: &Event) -> Map<String, Value> {
        let mut object = Map::new();
        if let Some(event_type) = &event.event_type {
            object.insert(EVENT_TYPE_KEY.to_owned(), Value::String(event_type.clone()));
        }
        if let Some(user_id) = &event.external_user_id {
            object.insert(
                EXTERNAL_USER_ID_KEY.to_owned(),
                Value::String(user_id.clone()),
            );
        }
        if let Some(date) = event.date {
            object.insert(DATE_KEY.to_owned(), Value::String(self.format_date(date)));
        }
        for (key, value) in &event.properties {
            object.insert(key.clone(), Value::String(value.clone()));
        }
        object
    }

    pub fn encode_events(&self, events: &[Event]) -> Value {
        Value::Array(
            events
                .iter()
                .map(|event| Value::Object(self.encode_event(event)))
                .collect(),
        )
    }

    /// Decode a JSON object into an event.
    ///
    /// Reserved keys go to their typed field, every other key to the property
    /// bag. Numbers and booleans are kept in their string form.
    pub fn decode_event(&self, value: &Value) -> Result<Event, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::NotAnObject(kind_of(value)))?;

        let mut event_type = None;
        let mut external_user_id = None;
        let mut date = None;
        let mut properties = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(DecodeError::UnsupportedValue {
                        key: key.clone(),
                        kind: kind_of(other),
                    })
                }
            };
            match key.as_str() {
                EVENT_TYPE_KEY => event_type = Some(text),
                EXTERNAL_USER_ID_KEY => external_user_id = Some(text),
                DATE_KEY => date = Some(self.parse_date(&text)?),
                _ => {
                    properties.insert(key.clone(), text);
                }
            }
        }

        Ok(Event {
            event_type,
            external_user_id,
            date,
            properties,
        })
    }

    /// Decode a JSON array of event objects, keeping their order
    pub fn decode_events(&self, values: &[Value]) -> Result<Vec<Event>, DecodeError> {
        values.iter().map(|value| self.decode_event(value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::Alphanumeric;
    use rand::Rng;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_format() {
        let codec = Codec::new();
        assert_eq!(codec.format_date(day(2014, 11, 22)), "20141122");
        assert_eq!(codec.format_date(day(2013, 1, 5)), "20130105");
        assert_eq!(codec.parse_date("20141122").unwrap(), day(2014, 11, 22));
    }

    #[test]
    fn non_canonical_dates_are_rejected() {
        let codec = Codec::new();
        for input in ["2014112", "2014-11-22", "201411221", "20141322", "", "yesterday"] {
            assert_eq!(
                codec.parse_date(input),
                Err(DecodeError::InvalidDate {
                    input: input.to_owned(),
                    format: EVENTHUB_DATE_FORMAT,
                }),
                "{input}"
            );
        }
    }

    #[test]
    fn encode_full_event() {
        let event = Event::new("submission", "generated_id_123")
            .with_date(day(2014, 11, 22))
            .unwrap()
            .with_property("exercise", "homepage_1")
            .unwrap();
        let encoded = Value::Object(Codec::new().encode_event(&event));
        assert_eq!(
            encoded,
            json!({
                "event_type": "submission",
                "external_user_id": "generated_id_123",
                "date": "20141122",
                "exercise": "homepage_1"
            })
        );
    }

    #[test]
    fn boundary_years_round_trip() {
        let codec = Codec::new();
        for date in [day(0, 1, 1), day(9999, 12, 31)] {
            let event = Event::new("a", "b").with_date(date).unwrap();
            let encoded = Value::Object(codec.encode_event(&event));
            assert_eq!(encoded[DATE_KEY].as_str().map(str::len), Some(8));
            assert_eq!(codec.decode_event(&encoded).unwrap(), event);
        }
    }

    #[test]
    fn encode_skips_unset_fields() {
        let event = Event::new("click", "userid");
        assert_eq!(
            serde_json::to_string(&Codec::new().encode_event(&event)).unwrap(),
            r#"{"event_type":"click","external_user_id":"userid"}"#
        );

        let encoded = Codec::new().encode_event(&Event::default());
        assert!(encoded.is_empty());
    }

    #[test]
    fn encode_keeps_typed_fields_first() {
        let event = Event::new("pageview", "u1")
            .with_date(day(2014, 11, 22))
            .unwrap()
            .with_property("a_page", "home")
            .unwrap();
        assert_eq!(
            serde_json::to_string(&Codec::new().encode_event(&event)).unwrap(),
            r#"{"event_type":"pageview","external_user_id":"u1","date":"20141122","a_page":"home"}"#
        );
    }

    #[test]
    fn decode_routes_reserved_keys() {
        let value = json!({
            "event_type": "signup",
            "external_user_id": "generated_id_123",
            "date": "20141122",
            "experiment": "signup_v1",
            "treatment": "control"
        });
        let event = Codec::new().decode_event(&value).unwrap();
        assert_eq!(event.event_type(), Some("signup"));
        assert_eq!(event.external_user_id(), Some("generated_id_123"));
        assert_eq!(event.date(), Some(day(2014, 11, 22)));
        assert_eq!(event.properties().len(), 2);
        assert_eq!(event.property("experiment"), Some("signup_v1"));
        assert_eq!(event.property("treatment"), Some("control"));
    }

    #[test]
    fn decode_partial_event() {
        let codec = Codec::new();
        let no_date = codec
            .decode_event(&json!({"event_type": "email_sent", "external_user_id": "id"}))
            .unwrap();
        assert_eq!(no_date, Event::new("email_sent", "id"));

        let no_type = codec
            .decode_event(&json!({"external_user_id": "id", "date": "20141122"}))
            .unwrap();
        assert_eq!(no_type.event_type(), None);
        assert_eq!(no_type.date(), Some(day(2014, 11, 22)));

        assert_eq!(codec.decode_event(&json!({})).unwrap(), Event::default());
    }

    #[test]
    fn decode_coerces_scalars_to_strings() {
        let event = Codec::new()
            .decode_event(&json!({"event_type": "score", "points": 42, "ratio": 0.5, "won": true}))
            .unwrap();
        assert_eq!(event.property("points"), Some("42"));
        assert_eq!(event.property("ratio"), Some("0.5"));
        assert_eq!(event.property("won"), Some("true"));
    }

    #[test]
    fn decode_failures() {
        let codec = Codec::new();
        assert_eq!(
            codec.decode_event(&json!(["not", "an", "object"])),
            Err(DecodeError::NotAnObject("an array"))
        );
        assert_eq!(
            codec.decode_event(&json!({"nested": {"a": 1}})),
            Err(DecodeError::UnsupportedValue {
                key: "nested".to_owned(),
                kind: "an object",
            })
        );
        assert!(matches!(
            codec.decode_event(&json!({"date": "22/11/2014"})),
            Err(DecodeError::InvalidDate { .. })
        ));

        let err: HubError = codec.decode_event(&json!(null)).unwrap_err().into();
        assert!(matches!(err, HubError::BadlyFormedResponseBody { .. }));
    }

    fn random_token<R: Rng>(rng: &mut R) -> String {
        let len = rng.gen_range(1..12);
        rng.sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    #[test]
    fn decode_inverts_encode() {
        let codec = Codec::new();
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let mut event = Event::default();
            if rng.gen_bool(0.8) {
                event.event_type = Some(random_token(&mut rng));
            }
            if rng.gen_bool(0.8) {
                event.external_user_id = Some(random_token(&mut rng));
            }
            if rng.gen_bool(0.8) {
                event.date = day(1970, 1, 1).checked_add_days(chrono::Days::new(rng.gen_range(0..40_000)));
            }
            for _ in 0..rng.gen_range(0..6) {
                let key = format!("p_{}", random_token(&mut rng));
                event.put_property(key, random_token(&mut rng)).unwrap();
            }

            let encoded = Value::Object(codec.encode_event(&event));
            assert_eq!(codec.decode_event(&encoded).unwrap(), event);
        }
    }
}
