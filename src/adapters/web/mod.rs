//! HTTP adapter: axum router over a [`DataPort`].
//!
//! Every response body is JSON. Errors use the envelope `{"error": "..."}`.

mod error;
mod extract;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use log::info;
use std::sync::Arc;
use std::time::Instant;

use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/product", post(handlers::create_product))
        .route(
            "/product/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/user", post(handlers::create_user))
        .route("/symbols", get(handlers::list_symbols))
        .route("/portfolio/{id}", get(handlers::get_portfolio))
        .route("/addwatch/portfolio/{id}", post(handlers::add_watch))
        .route("/removewatch/portfolio/{id}", put(handlers::remove_watch))
        .route("/news/{id}", get(handlers::get_news))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(state))
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        "{method} {path} -> {} ({:.1} ms)",
        response.status().as_u16(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    response
}
