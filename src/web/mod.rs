//! Minimal HTTP endpoint.
//!
//! - GET /hello - returns `{"Hello": "World"}`

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::WebSettings;

/// Create the web router
pub fn router() -> Router {
    Router::new().route("/hello", get(hello))
}

/// GET /hello
async fn hello() -> Json<Value> {
    Json(json!({"Hello": "World"}))
}

/// Bind the configured address and serve until the process exits
pub async fn serve(settings: &WebSettings) -> std::io::Result<()> {
    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Web server listening");

    axum::serve(listener, router()).await
}
