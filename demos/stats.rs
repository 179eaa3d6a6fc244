use eventhub::EventHub;

#[tokio::main]
async fn main() {
    let hub = EventHub::connect_with_defaults().unwrap();
    println!("{}", hub.get_server_stats().await.unwrap());
}
