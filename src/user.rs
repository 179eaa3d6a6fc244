use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::event::EXTERNAL_USER_ID_KEY;

/// A user known to EventHub, with its property bag
///
/// Used by `EventHub::add_or_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    external_id: String,
    properties: BTreeMap<String, String>,
}

impl User {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Insert a property, returning the previous value for the key.
    ///
    /// `external_user_id` is refused since it already names the user.
    pub fn put_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        let key = key.into();
        if key == EXTERNAL_USER_ID_KEY {
            return Err(Error::illegal_input(format!(
                "property key `{key}` is reserved"
            )));
        }
        Ok(self.properties.insert(key, value.into()))
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties() {
        let mut user = User::new("someone@example.com");
        assert_eq!(user.put_property("plan", "free").unwrap(), None);
        assert_eq!(
            user.put_property("plan", "pro").unwrap(),
            Some("free".to_owned())
        );
        assert_eq!(user.property("plan"), Some("pro"));
        assert_eq!(user.external_id(), "someone@example.com");
        assert!(user.put_property("external_user_id", "other").is_err());
        assert_eq!(user.properties().len(), 1);
    }
}
