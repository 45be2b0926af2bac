#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = lifetriage_server::config::Config::from_env()?;
    lifetriage_server::web::start_web_server(config).await
}
