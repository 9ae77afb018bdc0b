// rest/mod.rs — HTTP surface.
//
// Endpoints:
//   GET    /tasks
//   POST   /tasks
//   GET    /tasks/{id}
//   PUT    /tasks/{id}
//   DELETE /tasks/{id}
//   GET    /health

pub mod error;
pub mod routes;

use anyhow::{Context as _, Result};
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx)?;

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Result<Router> {
    // Browser clients are accepted from exactly one configured origin.
    let origin: HeaderValue = ctx
        .config
        .cors_origin
        .parse()
        .with_context(|| format!("invalid cors_origin '{}'", ctx.config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(cors)
        .with_state(ctx))
}
