use minds::{MindsServer, ServerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let addr = std::env::var("MINDS_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let mut builder = MindsServer::<minds_protocol::JsonCodec>::builder().bind(&addr);
    if let Ok(max_rooms) = std::env::var("MINDS_MAX_ROOMS") {
        match max_rooms.parse() {
            Ok(n) => builder = builder.max_rooms(n),
            Err(_) => tracing::warn!(max_rooms, "ignoring unparsable MINDS_MAX_ROOMS"),
        }
    }

    let server = builder.build().await?;
    tracing::info!(addr, "starting minds server");
    server.run().await
}
