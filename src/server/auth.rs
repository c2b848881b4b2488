use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::server::AppError;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Credentials accepted in the `X-API-Key` header. An empty set admits nobody.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys(Arc<HashSet<String>>);

impl ApiKeys {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>
    {
        Self(Arc::new(keys.into_iter().map(Into::into).collect()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) async fn require_api_key(State(api_keys): State<ApiKeys>, request: Request, next: Next) -> Response {
    let admitted = request.headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| api_keys.contains(key));

    if !admitted {
        warn!("Rejected {} {}: missing or unknown API key", request.method(), request.uri().path());
        return AppError::Unauthorized.into_response();
    }

    next.run(request).await
}
