#[tokio::main]
async fn main() {
    events_compass::run().await;
}
