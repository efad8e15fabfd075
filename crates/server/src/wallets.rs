//! Wallets API endpoints.

use api_types::{
    MessageResponse,
    wallet::{WalletResponse, WalletUpsert, WalletView, WalletsResponse},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{User, Wallet};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ServerError, detached, server::ServerState};

fn view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        balance: wallet.balance.to_string(),
        balance_minor: wallet.balance.minor(),
        name: wallet.name,
        currency: wallet.currency.code().to_string(),
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<WalletsResponse>, ServerError> {
    let wallets = state.engine.wallets(user.id).await?;
    Ok(Json(WalletsResponse {
        wallets: wallets.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(wallet_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<WalletResponse>, ServerError> {
    let wallet = state.engine.wallet(user.id, wallet_id).await?;
    Ok(Json(WalletResponse {
        wallet: view(wallet),
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<WalletUpsert>, ServerError>,
) -> Result<(StatusCode, Json<WalletResponse>), ServerError> {
    let engine = Arc::clone(&state.engine);
    let wallet = detached(async move {
        engine
            .new_wallet(user.id, &payload.name, payload.currency.as_deref())
            .await
    })
    .await?;
    tracing::info!(wallet_id = %wallet.id, "wallet created");

    Ok((
        StatusCode::CREATED,
        Json(WalletResponse {
            wallet: view(wallet),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(wallet_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<WalletUpsert>, ServerError>,
) -> Result<Json<WalletResponse>, ServerError> {
    let engine = Arc::clone(&state.engine);
    let wallet = detached(async move {
        engine
            .update_wallet(
                user.id,
                wallet_id,
                &payload.name,
                payload.currency.as_deref(),
            )
            .await
    })
    .await?;

    Ok(Json(WalletResponse {
        wallet: view(wallet),
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(wallet_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<MessageResponse>, ServerError> {
    let engine = Arc::clone(&state.engine);
    detached(async move { engine.delete_wallet(user.id, wallet_id).await }).await?;
    tracing::info!(%wallet_id, "wallet deleted");

    Ok(Json(MessageResponse {
        message: "wallet deleted".to_string(),
    }))
}

/// Rebuilds the cached balance from the wallet's transactions.
pub async fn recalculate(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(wallet_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<WalletResponse>, ServerError> {
    let engine = Arc::clone(&state.engine);
    let user_id = user.id;
    let balance =
        detached(async move { engine.recalculate_wallet_balance(user_id, wallet_id).await })
            .await?;
    tracing::info!(%wallet_id, %balance, "wallet balance recalculated");

    let wallet = state.engine.wallet(user.id, wallet_id).await?;
    Ok(Json(WalletResponse {
        wallet: view(wallet),
    }))
}
