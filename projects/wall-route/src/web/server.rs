use crate::overlay::svg::OverlayStyle;
use crate::web::api::{
    create_analysis_handler, get_overlay_handler, health_handler, select_hold_handler, AppState,
};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/analysis", post(create_analysis_handler))
        .route("/api/overlay", get(get_overlay_handler))
        .route("/api/select", post(select_hold_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host` on `port`, or on the next free port above it.
async fn bind_from(host: IpAddr, port: u16) -> Result<TcpListener> {
    for candidate in port..=u16::MAX {
        let addr = SocketAddr::new(host, candidate);
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) => warn!("Port {} unavailable on {}: {}", candidate, host, e),
        }
    }
    anyhow::bail!("No free port on {} at or above {}", host, port)
}

pub async fn run_server(host: IpAddr, port: u16, style: OverlayStyle) -> Result<()> {
    let listener = bind_from(host, port).await?;
    let app = router(Arc::new(AppState::new(style)));

    info!("Wall route server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
