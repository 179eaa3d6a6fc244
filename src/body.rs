//! `application/x-www-form-urlencoded` bodies posted to EventHub
//!
//! Event types, filter keys and filter values are written verbatim, exactly
//! as the server expects them.

use chrono::NaiveDate;

use crate::codec::Codec;
use crate::event::Event;
use crate::filter::{encode_filters, FilterMap};
use crate::options::{CohortTableOptions, FunnelOptions};

const USER_FILTER_KEYS: &str = "ufk[]";
const USER_FILTER_VALUES: &str = "ufv[]";
const ROW_FILTER_KEYS: &str = "refk[]";
const ROW_FILTER_VALUES: &str = "refv[]";
const COLUMN_FILTER_KEYS: &str = "cefk[]";
const COLUMN_FILTER_VALUES: &str = "cefv[]";

/// `start_date=<yyyyMMdd>&end_date=<yyyyMMdd>`
pub fn date_range(codec: &Codec, start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!(
        "start_date={}&end_date={}",
        codec.format_date(start_date),
        codec.format_date(end_date)
    )
}

/// Body of `/events/funnel`
pub fn funnel(codec: &Codec, options: &FunnelOptions) -> String {
    let mut body = date_range(codec, options.start_date, options.end_date);
    for step in &options.funnel_steps {
        body.push_str("&funnel_steps[]=");
        body.push_str(step);
    }
    body.push_str(&format!(
        "&num_days_to_complete_funnel={}",
        options.days_to_complete_funnel
    ));
    body
}

/// Body of `/events/cohort`
///
/// A filter fragment is appended only when its map has entries.
pub fn cohort_table(codec: &Codec, options: &CohortTableOptions) -> String {
    let mut body = format!(
        "{}&row_event_type={}&column_event_type={}&num_days_per_row={}&num_columns={}",
        date_range(codec, options.start_date, options.end_date),
        options.row_event_type,
        options.column_event_type,
        options.num_days_per_row,
        options.num_columns
    );
    append_filters(&mut body, &options.row_filters, ROW_FILTER_KEYS, ROW_FILTER_VALUES);
    append_filters(
        &mut body,
        &options.column_filters,
        COLUMN_FILTER_KEYS,
        COLUMN_FILTER_VALUES,
    );
    body
}

fn append_filters(body: &mut String, filters: &FilterMap, key_field: &str, value_field: &str) {
    if filters.is_empty() {
        return;
    }
    body.push('&');
    body.push_str(&encode_filters(filters, key_field, value_field));
}

/// Body of `/events/batch_track`: `events=` followed by a JSON array
pub fn batch_track(codec: &Codec, events: &[Event]) -> String {
    format!("events={}", codec.encode_events(events))
}

/// Body of `/users/find`
pub fn user_find(filters: &FilterMap) -> String {
    encode_filters(filters, USER_FILTER_KEYS, USER_FILTER_VALUES)
}
