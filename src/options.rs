//! Options which can be passed to various `EventHub` queries.

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::errors::Result;
use crate::filter::FilterMap;
use crate::validate::{not_empty, not_zero, wire_date};

/// Paging for `EventHub::get_user_timeline`.  This uses a "builder" pattern,
/// so most methods will consume the object and return a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineOptions {
    offset: u32,
    num_records: u32,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            num_records: 10,
        }
    }
}

impl TimelineOptions {
    /// Skip the first `n` events of the timeline.
    pub fn offset(mut self, n: u32) -> Self {
        self.offset = n;
        self
    }

    /// Return at most `n` events.
    pub fn num_records(mut self, n: u32) -> Self {
        self.num_records = n;
        self
    }

    /// Convert to URL parameters, appended after `external_user_id`.
    pub fn to_url_params(&self, external_user_id: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("external_user_id", external_user_id)
            .append_pair("offset", &self.offset.to_string())
            .append_pair("num_records", &self.num_records.to_string())
            .finish()
    }
}

/// Parameters of `EventHub::retrieve_event_funnel_counts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelOptions {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// event types, in funnel order
    pub funnel_steps: Vec<String>,
    pub days_to_complete_funnel: u32,
}

impl FunnelOptions {
    pub fn new<I, S>(
        start_date: NaiveDate,
        end_date: NaiveDate,
        funnel_steps: I,
        days_to_complete_funnel: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_date,
            end_date,
            funnel_steps: funnel_steps.into_iter().map(Into::into).collect(),
            days_to_complete_funnel,
        }
    }

    pub fn validate(&self) -> Result<()> {
        wire_date(self.start_date, "start date")?;
        wire_date(self.end_date, "end date")?;
        not_empty(&self.funnel_steps, "funnel steps")?;
        for step in &self.funnel_steps {
            not_empty(step, "funnel step")?;
        }
        not_zero(self.days_to_complete_funnel, "days to complete funnel")?;
        Ok(())
    }
}

/// Parameters of `EventHub::retrieve_event_cohort_table`
///
/// Filters are optional. An empty filter map is left out of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortTableOptions {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub row_event_type: String,
    pub column_event_type: String,
    pub num_days_per_row: u32,
    pub num_columns: u32,
    pub row_filters: FilterMap,
    pub column_filters: FilterMap,
}

impl CohortTableOptions {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        row_event_type: impl Into<String>,
        column_event_type: impl Into<String>,
        num_days_per_row: u32,
        num_columns: u32,
    ) -> Self {
        Self {
            start_date,
            end_date,
            row_event_type: row_event_type.into(),
            column_event_type: column_event_type.into(),
            num_days_per_row,
            num_columns,
            row_filters: FilterMap::new(),
            column_filters: FilterMap::new(),
        }
    }

    /// Restrict the row event by one of its properties.
    pub fn row_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.row_filters.insert(key.into(), value.into());
        self
    }

    /// Restrict the column event by one of its properties.
    pub fn column_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.column_filters.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        wire_date(self.start_date, "start date")?;
        wire_date(self.end_date, "end date")?;
        not_empty(&self.row_event_type, "row event type")?;
        not_empty(&self.column_event_type, "column event type")?;
        not_zero(self.num_days_per_row, "number of days per row")?;
        not_zero(self.num_columns, "number of columns")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn timeline_params() {
        assert_eq!(
            TimelineOptions::default().to_url_params("someone@example.com"),
            "external_user_id=someone%40example.com&offset=0&num_records=10"
        );
        assert_eq!(
            TimelineOptions::default()
                .offset(20)
                .num_records(5)
                .to_url_params("u"),
            "external_user_id=u&offset=20&num_records=5"
        );
    }

    #[test]
    fn funnel_validation() {
        let start = day(2013, 12, 25);
        let end = day(2014, 12, 25);
        assert!(FunnelOptions::new(start, end, ["one"], 7).validate().is_ok());
        for invalid in [
            FunnelOptions::new(start, end, Vec::<String>::new(), 7),
            FunnelOptions::new(start, end, ["one", ""], 7),
            FunnelOptions::new(start, end, ["one"], 0),
            FunnelOptions::new(day(10000, 1, 1), end, ["one"], 7),
            FunnelOptions::new(start, day(-1, 12, 31), ["one"], 7),
        ] {
            assert!(matches!(
                invalid.validate(),
                Err(Error::IllegalInput { .. })
            ));
        }
    }

    #[test]
    fn cohort_validation() {
        let base = CohortTableOptions::new(day(2013, 12, 25), day(2014, 12, 25), "row", "col", 1, 1);
        assert!(base.validate().is_ok());

        let mut no_row_type = base.clone();
        no_row_type.row_event_type.clear();
        let mut no_column_type = base.clone();
        no_column_type.column_event_type.clear();
        let mut zero_days = base.clone();
        zero_days.num_days_per_row = 0;
        let mut zero_columns = base.clone();
        zero_columns.num_columns = 0;
        let mut far_start = base.clone();
        far_start.start_date = day(12000, 1, 1);
        let mut negative_end = base;
        negative_end.end_date = day(-5, 6, 1);

        for invalid in [
            no_row_type,
            no_column_type,
            zero_days,
            zero_columns,
            far_start,
            negative_end,
        ] {
            assert!(matches!(
                invalid.validate(),
                Err(Error::IllegalInput { .. })
            ));
        }
    }

    #[test]
    fn cohort_filters_accumulate() {
        let options = CohortTableOptions::new(day(2013, 12, 25), day(2014, 12, 25), "row", "col", 1, 1)
            .row_filter("rf1", "rfv1")
            .column_filter("cf1", "cfv1")
            .column_filter("cf2", "cfv2");
        assert_eq!(options.row_filters.len(), 1);
        assert_eq!(options.column_filters.len(), 2);
        assert_eq!(options.column_filters["cf2"], "cfv2");
    }
}
