//! Transactions API endpoints

use api_types::{
    MessageResponse,
    transaction::{
        BreakdownQuery, BreakdownResponse, CategoryTotalView, SummaryQuery, SummaryResponse,
        SummaryView, TransactionList, TransactionResponse, TransactionUpsert, TransactionView,
        TransactionsResponse,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{
    CategoryTotal, CreateTransactionCmd, EngineError, Money, Summary, TransactionDetail,
    TransactionListFilter, UpdateTransactionCmd, User,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ServerError, detached, parse_kind, server::ServerState};

fn view(detail: TransactionDetail) -> TransactionView {
    let tx = detail.transaction;
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        wallet_name: detail.wallet_name,
        category_id: tx.category_id,
        category_name: detail.category_name,
        category_color: detail.category_color,
        category_icon: detail.category_icon,
        amount: tx.amount.to_string(),
        amount_minor: tx.amount.minor(),
        kind: tx.kind.to_string(),
        description: tx.description,
        transaction_date: tx.transaction_date,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

/// Resolves the amount of a payload from either `amount` or `amountMinor`.
fn payload_amount(payload: &TransactionUpsert) -> Result<Money, ServerError> {
    let fail = |msg: &str| ServerError::from(EngineError::Validation(vec![msg.to_string()]));
    match (&payload.amount, payload.amount_minor) {
        (Some(amount), None) => Ok(amount.to_string().parse::<Money>()?),
        (None, Some(minor)) => Ok(Money::new(minor)),
        (None, None) => Err(fail("amount is required")),
        (Some(_), Some(_)) => Err(fail("send either amount or amountMinor, not both")),
    }
}

fn summary_view(summary: Summary) -> SummaryView {
    SummaryView {
        total_income_minor: summary.total_income.minor(),
        total_expense_minor: summary.total_expense.minor(),
        net_minor: summary.net().minor(),
        transaction_count: summary.transaction_count,
    }
}

fn total_view(total: CategoryTotal) -> CategoryTotalView {
    CategoryTotalView {
        category_id: total.category_id,
        name: total.name,
        color: total.color,
        icon: total.icon,
        total_minor: total.total.minor(),
        count: total.count,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<TransactionList>, ServerError>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let filter = TransactionListFilter {
        wallet_id: query.wallet_id,
        category_id: query.category_id,
        kind: query.kind.as_deref().map(parse_kind).transpose()?,
        start_date: query.start_date,
        end_date: query.end_date,
        limit: query.limit,
    };

    let transactions = state.engine.list_transactions(user.id, &filter).await?;
    Ok(Json(TransactionsResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<TransactionResponse>, ServerError> {
    let detail = state.engine.transaction(user.id, transaction_id).await?;
    Ok(Json(TransactionResponse {
        transaction: view(detail),
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionUpsert>, ServerError>,
) -> Result<(StatusCode, Json<TransactionResponse>), ServerError> {
    let cmd = CreateTransactionCmd {
        user_id: user.id,
        wallet_id: payload.wallet_id,
        category_id: payload.category_id,
        amount: payload_amount(&payload)?,
        kind: parse_kind(&payload.kind)?,
        description: payload.description,
        transaction_date: payload.transaction_date,
    };

    let engine = Arc::clone(&state.engine);
    let tx = detached(async move { engine.create_transaction(cmd).await }).await?;
    tracing::info!(
        transaction_id = %tx.id,
        wallet_id = %tx.wallet_id,
        kind = %tx.kind,
        amount = %tx.amount,
        "transaction created"
    );

    let detail = state.engine.transaction(user.id, tx.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction: view(detail),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionUpsert>, ServerError>,
) -> Result<Json<TransactionResponse>, ServerError> {
    let cmd = UpdateTransactionCmd {
        user_id: user.id,
        transaction_id,
        wallet_id: payload.wallet_id,
        category_id: payload.category_id,
        amount: payload_amount(&payload)?,
        kind: parse_kind(&payload.kind)?,
        description: payload.description,
        transaction_date: payload.transaction_date,
    };

    let engine = Arc::clone(&state.engine);
    let tx = detached(async move { engine.update_transaction(cmd).await }).await?;
    tracing::info!(transaction_id = %tx.id, wallet_id = %tx.wallet_id, "transaction updated");

    let detail = state.engine.transaction(user.id, tx.id).await?;
    Ok(Json(TransactionResponse {
        transaction: view(detail),
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<MessageResponse>, ServerError> {
    let engine = Arc::clone(&state.engine);
    detached(async move { engine.delete_transaction(user.id, transaction_id).await }).await?;
    tracing::info!(%transaction_id, "transaction deleted");

    Ok(Json(MessageResponse {
        message: "transaction deleted".to_string(),
    }))
}

pub async fn summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<SummaryQuery>, ServerError>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let summary = state
        .engine
        .summary(user.id, query.start_date, query.end_date)
        .await?;
    Ok(Json(SummaryResponse {
        summary: summary_view(summary),
    }))
}

pub async fn breakdown(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<BreakdownQuery>, ServerError>,
) -> Result<Json<BreakdownResponse>, ServerError> {
    let kind = parse_kind(&query.kind)?;
    let totals = state
        .engine
        .category_breakdown(user.id, query.start_date, query.end_date, kind)
        .await?;
    Ok(Json(BreakdownResponse {
        breakdown: totals.into_iter().map(total_view).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::transaction::DecimalAmount;
    use chrono::NaiveDate;

    fn payload(amount: Option<DecimalAmount>, amount_minor: Option<i64>) -> TransactionUpsert {
        TransactionUpsert {
            wallet_id: Uuid::new_v4(),
            category_id: None,
            amount,
            amount_minor,
            kind: "expense".to_string(),
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn messages(err: ServerError) -> Vec<String> {
        match err {
            ServerError::Engine(err) => err.messages(),
            ServerError::Internal(msg) => panic!("unexpected internal error: {msg}"),
        }
    }

    #[test]
    fn decimal_amount_is_converted_to_minor_units() {
        let amount = payload_amount(&payload(Some(DecimalAmount::Number(12.5)), None)).unwrap();
        assert_eq!(amount, Money::new(1_250));

        let amount =
            payload_amount(&payload(Some(DecimalAmount::Text("7,05".to_string())), None)).unwrap();
        assert_eq!(amount, Money::new(705));

        let amount = payload_amount(&payload(None, Some(300))).unwrap();
        assert_eq!(amount, Money::new(300));
    }

    #[test]
    fn amount_must_be_given_exactly_once() {
        let err = payload_amount(&payload(None, None)).unwrap_err();
        assert_eq!(messages(err), vec!["amount is required"]);

        let err = payload_amount(&payload(Some(DecimalAmount::Number(1.0)), Some(100))).unwrap_err();
        assert_eq!(
            messages(err),
            vec!["send either amount or amountMinor, not both"]
        );

        let err =
            payload_amount(&payload(Some(DecimalAmount::Text("1.234".to_string())), None))
                .unwrap_err();
        assert_eq!(messages(err), vec!["amount must have at most 2 decimals"]);
    }
}
