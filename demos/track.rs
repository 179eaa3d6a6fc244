use eventhub::{Event, EventHub, TimelineOptions};

#[tokio::main]
async fn main() {
    let hub = EventHub::connect_with_defaults().unwrap();
    let user = "chengtao@codecademy.com";

    let signup = Event::new("signup", user)
        .with_date(chrono::Local::now().date_naive())
        .unwrap()
        .with_property("experiment", "fake_experiment")
        .unwrap()
        .with_property("treatment", "control")
        .unwrap();
    hub.track_event(&signup).await.unwrap();

    let views = vec![
        Event::new("view", user).with_property("page", "home").unwrap(),
        Event::new("view", user).with_property("page", "pricing").unwrap(),
    ];
    hub.batch_track_events(&views).await.unwrap();

    for event in hub
        .get_user_timeline(user, &TimelineOptions::default())
        .await
        .unwrap()
    {
        println!("{:?}", event);
    }
}
