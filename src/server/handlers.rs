use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Category, Transaction};
use crate::server::{AppError, AppState};
use crate::storage::BalanceStore;
use crate::types::{AccountId, Amount};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>
}

impl ApprovalResponse {
    fn approved(count: Option<usize>) -> Self {
        Self { status: "approved".to_string(), count }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub account: AccountId,
    pub category: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account: AccountId,
    pub category: Category,
    pub balance: Amount
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    pub account: AccountId,
    pub category: Category,
    pub amount: Amount
}

pub(crate) async fn authorize<S: BalanceStore>(
    State(state): State<AppState<S>>,
    Json(transaction): Json<Transaction>
) -> Result<Json<ApprovalResponse>, AppError> {
    state.authorizer.authorize(&transaction).await?;

    info!("Transaction for account [{}] at [{}] approved", transaction.account, transaction.merchant);

    Ok(Json(ApprovalResponse::approved(None)))
}

pub(crate) async fn authorize_batch<S: BalanceStore>(
    State(state): State<AppState<S>>,
    Json(batch): Json<Vec<Transaction>>
) -> Result<Json<ApprovalResponse>, AppError> {
    state.authorizer.authorize_batch(&batch).await?;

    info!("Batch of {} transactions approved", batch.len());

    Ok(Json(ApprovalResponse::approved(Some(batch.len()))))
}

pub(crate) async fn get_balance<S: BalanceStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<BalanceQuery>
) -> Result<Json<BalanceResponse>, AppError> {
    let category: Category = query.category.parse()?;
    let balance = state.authorizer.get_balance(&query.account, category).await?;

    Ok(Json(BalanceResponse { account: query.account, category, balance }))
}

pub(crate) async fn deposit<S: BalanceStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<DepositRequest>
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.authorizer.deposit(&request.account, request.category, request.amount).await?;

    info!("Deposit of [{}] on account [{}]:[{}] accepted", request.amount, request.account, request.category);

    Ok(Json(BalanceResponse { account: request.account, category: request.category, balance }))
}
