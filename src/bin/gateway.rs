//! Unkey gateway binary.
//!
//! Exposes `POST /create`, `GET /key`, and `GET /protected`, each proxying
//! to the Unkey API through the retrying client.
//!
//! # Environment variables
//!
//! | Variable        | Default | Description                          |
//! |-----------------|---------|--------------------------------------|
//! | `UNKEY_API_URL` | —       | Unkey API base URL (required)        |
//! | `UNKEY_API_KEY` | —       | Root key (required)                  |
//! | `GATEWAY_PORT`  | `8080`  | TCP port to listen on                |
//! | `RUST_LOG`      | `info`  | Log filter (tracing-subscriber)      |

use unkey_http::{
    config::GatewayConfig,
    gateway::{router, GatewayState},
    UnkeyClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::from_env().expect("Invalid gateway configuration");
    let GatewayConfig {
        base_url,
        root_key,
        port,
    } = config;

    tracing::info!(port, base_url = %base_url, "Unkey gateway starting");

    let client = UnkeyClient::new(base_url, root_key);
    let app = router(GatewayState { client });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!(port, "Listening");
    axum::serve(listener, app).await.expect("Server error");
}
