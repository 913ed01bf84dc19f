#[tokio::main]
async fn main() -> anyhow::Result<()> {
    civdoc_server::start().await
}
