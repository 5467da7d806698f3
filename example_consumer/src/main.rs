//! ChatBot Manager API server.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Settings come from the environment (and `.env`), see `chatbot_manager::settings`.

use chatbot_manager::{build_router, AppState, SchemaStore, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    settings.init_tracing();

    tracing::info!("Starting ChatBot Manager v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {:?}", settings.data_dir);

    let store = SchemaStore::open(Arc::new(settings.storage()));
    let state = AppState::new(store);
    let app = build_router(state, &settings);

    let listener = TcpListener::bind(settings.listen_addr).await?;
    tracing::info!("ChatBot Manager listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
