//! HTTP request handlers.
//!
//! Each handler parses its inputs, makes exactly one [`DataPort`] call and
//! turns the outcome into a status code and JSON body.
//!
//! [`DataPort`]: crate::ports::data_port::DataPort

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::page::Page;
use crate::domain::portfolio::WatchRequest;
use crate::domain::product::ProductInput;
use crate::domain::user::NewUser;

use super::error::NOT_FOUND;
use super::extract::{IdPath, Payload, ProductLabel, SymbolLabel, UserLabel};
use super::{AppState, WebError};

#[derive(Serialize)]
struct OpResult {
    result: &'static str,
}

fn page_from(params: &HashMap<String, String>) -> Page {
    Page::from_query(
        params.get("start").map(String::as_str),
        params.get("count").map(String::as_str),
    )
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let products = state.data_port.list_products(page_from(&params))?;
    Ok(Json(products).into_response())
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Payload(input): Payload<ProductInput>,
) -> Result<Response, WebError> {
    let product = state.data_port.create_product(input)?;
    debug!("created product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    IdPath(id, _): IdPath<ProductLabel>,
) -> Result<Response, WebError> {
    let product = state
        .data_port
        .get_product(id)
        .map_err(|e| WebError::lookup(e, "Product not found"))?;
    Ok(Json(product).into_response())
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    IdPath(id, _): IdPath<ProductLabel>,
    Payload(input): Payload<ProductInput>,
) -> Result<Response, WebError> {
    let product = input.with_id(id);
    state.data_port.update_product(&product)?;
    Ok(Json(product).into_response())
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    IdPath(id, _): IdPath<ProductLabel>,
) -> Result<Response, WebError> {
    state.data_port.delete_product(id)?;
    debug!("deleted product {id}");
    Ok(Json(OpResult { result: "success" }).into_response())
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Payload(input): Payload<NewUser>,
) -> Result<Response, WebError> {
    let user = state.data_port.create_user(input)?;
    debug!("created user {}", user.user_id);
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn list_symbols(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let symbols = state.data_port.list_symbols()?;
    Ok(Json(symbols).into_response())
}

pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    IdPath(user_id, _): IdPath<UserLabel>,
) -> Result<Response, WebError> {
    let entries = state
        .data_port
        .get_portfolio(user_id)
        .map_err(|e| WebError::lookup(e, "Portfolio not found"))?;
    Ok(Json(entries).into_response())
}

/// `POST /addwatch/portfolio/{symbol_id}`; the user comes from the body.
pub async fn add_watch(
    State(state): State<Arc<AppState>>,
    IdPath(symbol_id, _): IdPath<SymbolLabel>,
    Payload(request): Payload<WatchRequest>,
) -> Result<Response, WebError> {
    let entry = state
        .data_port
        .create_portfolio_entry(request.into_new_entry(symbol_id))?;
    debug!(
        "user {} now watching symbol {} (entry {})",
        entry.user_id, entry.symbol_id, entry.portfolio_id
    );
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

/// `PUT /removewatch/portfolio/{symbol_id}`; the user comes from the body.
pub async fn remove_watch(
    State(state): State<Arc<AppState>>,
    IdPath(symbol_id, _): IdPath<SymbolLabel>,
    Payload(request): Payload<WatchRequest>,
) -> Result<Response, WebError> {
    state
        .data_port
        .set_watched_false(symbol_id, request.user_id)?;
    Ok(Json(request.into_unwatched(symbol_id)).into_response())
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    IdPath(user_id, _): IdPath<UserLabel>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let news = state
        .data_port
        .get_news(user_id, page_from(&params))
        .map_err(|e| WebError::lookup(e, "News not found"))?;
    Ok(Json(news).into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found(NOT_FOUND)
}
