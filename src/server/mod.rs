//! HTTP surface over the [`Authorizer`].
//!
//! | Route                        | Operation |
//! |------------------------------|-----------|
//! | `POST /transaction`          | single authorization |
//! | `POST /transaction-pipeline` | batch authorization |
//! | `GET /balance`               | balance query (`?account=&category=`) |
//! | `PUT /deposit`               | deposit |
//!
//! Every route requires an `X-API-Key` header from the configured [`ApiKeys`].

mod auth;
mod errors;
mod handlers;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};

use crate::engine::Authorizer;
use crate::storage::BalanceStore;

pub use auth::{API_KEY_HEADER, ApiKeys};
pub use errors::{AppError, ErrorResponse};
pub use handlers::{ApprovalResponse, BalanceQuery, BalanceResponse, DepositRequest};

pub struct AppState<S> {
    pub authorizer: Arc<Authorizer<S>>
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            authorizer: self.authorizer.clone()
        }
    }
}

pub fn create_router<S: BalanceStore>(authorizer: Arc<Authorizer<S>>, api_keys: ApiKeys) -> Router {
    Router::new()
        .route("/transaction", post(handlers::authorize::<S>))
        .route("/transaction-pipeline", post(handlers::authorize_batch::<S>))
        .route("/balance", get(handlers::get_balance::<S>))
        .route("/deposit", put(handlers::deposit::<S>))
        .route_layer(from_fn_with_state(api_keys, auth::require_api_key))
        .with_state(AppState { authorizer })
}
