#[tokio::main]
async fn main() -> anyhow::Result<()> {
    faqgen_server::start().await
}
