//! Request extractors that fail with the JSON error envelope.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use super::error::{INVALID_PAYLOAD, NOT_FOUND, WebError};

/// JSON body, parsed regardless of `Content-Type`.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| WebError::bad_request(INVALID_PAYLOAD))?;
        serde_json::from_slice(&bytes)
            .map(Payload)
            .map_err(|_| WebError::bad_request(INVALID_PAYLOAD))
    }
}

/// Names the resource an id refers to in `Invalid <label> ID` messages.
pub trait IdLabel {
    const LABEL: &'static str;
}

pub enum ProductLabel {}
pub enum UserLabel {}
pub enum SymbolLabel {}

impl IdLabel for ProductLabel {
    const LABEL: &'static str = "product";
}

impl IdLabel for UserLabel {
    const LABEL: &'static str = "user";
}

impl IdLabel for SymbolLabel {
    const LABEL: &'static str = "symbol";
}

/// The single `{id}` path segment, checked before the body is read.
///
/// A segment that is not plain digits (including one that percent-decodes
/// to invalid UTF-8) is treated as an unmatched route.
pub struct IdPath<L>(pub i64, pub(super) PhantomData<L>);

impl<S, L> FromRequestParts<S> for IdPath<L>
where
    S: Send + Sync,
    L: IdLabel + Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| WebError::not_found(NOT_FOUND))?;
        parse_id(&raw, L::LABEL).map(|id| IdPath(id, PhantomData))
    }
}

/// Parse an id path segment. Only unsigned decimal segments name a
/// resource; an all-digit value too large for `i64` is a bad request.
fn parse_id(raw: &str, label: &str) -> Result<i64, WebError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WebError::not_found(NOT_FOUND));
    }
    raw.parse()
        .map_err(|_| WebError::bad_request(format!("Invalid {label} ID")))
}
