use terraform_provider_pingdirectory::{init_logging, serve, PingDirectoryProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting PingDirectory provider");
    serve(PingDirectoryProvider::new()).await
}
