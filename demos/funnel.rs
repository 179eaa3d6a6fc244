use chrono::{Days, Local};
use eventhub::{CohortTableOptions, EventHub, FunnelOptions};

#[tokio::main]
async fn main() {
    let hub = EventHub::connect_with_defaults().unwrap();
    let end = Local::now().date_naive();
    let start = end.checked_sub_days(Days::new(30)).unwrap();

    let funnel = FunnelOptions::new(start, end, ["signup", "view", "purchase"], 7);
    let counts = hub.retrieve_event_funnel_counts(&funnel).await.unwrap();
    for (step, count) in funnel.funnel_steps.iter().zip(counts) {
        println!("{:>10}: {}", step, count);
    }

    let cohort = CohortTableOptions::new(start, end, "signup", "view", 7, 4)
        .row_filter("experiment", "fake_experiment");
    for row in hub.retrieve_event_cohort_table(&cohort).await.unwrap() {
        println!("{:?}", row);
    }
}
