//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.

use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before ServerConfig reads BIND_ADDRESS
    dotenvy::dotenv().ok();

    start_server(ServerConfig::default()).await
}
