#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rollcalld::run_app().await
}
