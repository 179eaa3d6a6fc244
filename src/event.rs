use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::errors::{Error, Result};
use crate::validate::wire_date;

pub const EVENT_TYPE_KEY: &str = "event_type";
pub const EXTERNAL_USER_ID_KEY: &str = "external_user_id";
pub const DATE_KEY: &str = "date";

/// Keys carried by typed fields, never by the property bag
pub const RESERVED_KEYS: [&str; 3] = [EVENT_TYPE_KEY, EXTERNAL_USER_ID_KEY, DATE_KEY];

pub(crate) fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// One tracked occurrence
///
/// Events coming back from a timeline may be partial, so every typed field
/// is optional. The property bag never contains a reserved key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub(crate) event_type: Option<String>,
    pub(crate) external_user_id: Option<String>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) properties: BTreeMap<String, String>,
}

impl Event {
    pub fn new(event_type: impl Into<String>, external_user_id: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            external_user_id: Some(external_user_id.into()),
            date: None,
            properties: BTreeMap::new(),
        }
    }

    /// Day the event occurred
    ///
    /// Years outside 0..=9999 are refused with `Error::IllegalInput`.
    pub fn with_date(mut self, date: NaiveDate) -> Result<Self> {
        self.date = Some(wire_date(date, "event date")?);
        Ok(self)
    }

    /// Builder form of [`Event::put_property`]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.put_property(key, value)?;
        Ok(self)
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn external_user_id(&self) -> Option<&str> {
        self.external_user_id.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Insert a property, returning the previous value for the key.
    ///
    /// Reserved keys (`event_type`, `external_user_id`, `date`) are refused
    /// with `Error::IllegalInput`; set the typed field instead.
    pub fn put_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(Error::illegal_input(format!(
                "property key `{key}` is reserved"
            )));
        }
        Ok(self.properties.insert(key, value.into()))
    }

    pub fn remove_property(&mut self, key: &str) -> Option<String> {
        self.properties.remove(key)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}
