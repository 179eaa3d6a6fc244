//! Pre-flight argument checks
//!
//! Every guard fails with `Error::IllegalInput`. The façade runs them before
//! building a request, so a rejected call never reaches the transport.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::errors::{Error, Result};

/// Values that have a notion of emptiness
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

impl IsEmpty for str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for [T] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> IsEmpty for HashMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Require an optional value to be present
pub fn not_null<'a, T: ?Sized>(value: Option<&'a T>, name: &str) -> Result<&'a T> {
    value.ok_or_else(|| Error::illegal_input(format!("{name} must not be null")))
}

/// Require a string, list or map to hold at least one element
pub fn not_empty<'a, T: IsEmpty + ?Sized>(value: &'a T, name: &str) -> Result<&'a T> {
    if value.is_empty_value() {
        Err(Error::illegal_input(format!("{name} must not be empty")))
    } else {
        Ok(value)
    }
}

/// Require a count to be non-zero
pub fn not_zero(value: u32, name: &str) -> Result<u32> {
    if value == 0 {
        Err(Error::illegal_input(format!("{name} must not be zero")))
    } else {
        Ok(value)
    }
}

/// Require a date that fits the `yyyyMMdd` wire form, i.e. a year in 0..=9999
pub fn wire_date(value: NaiveDate, name: &str) -> Result<NaiveDate> {
    if (0..=9999).contains(&value.year()) {
        Ok(value)
    } else {
        Err(Error::illegal_input(format!(
            "{name} {value} has no yyyyMMdd form"
        )))
    }
}
