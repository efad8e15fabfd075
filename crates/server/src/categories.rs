//! Categories API endpoints.

use api_types::{
    MessageResponse,
    category::{
        CategoriesResponse, CategoryList, CategoryResponse, CategoryUpsert, CategoryView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Category, CategoryCmd, User};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ServerError, detached, parse_kind, server::ServerState};

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: category.kind.to_string(),
        color: category.color,
        icon: category.icon,
    }
}

fn to_cmd(user: &User, payload: CategoryUpsert) -> Result<CategoryCmd, ServerError> {
    Ok(CategoryCmd {
        user_id: user.id,
        name: payload.name,
        kind: parse_kind(&payload.kind)?,
        color: payload.color,
        icon: payload.icon,
    })
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<CategoryList>, ServerError>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let kind = query.kind.as_deref().map(parse_kind).transpose()?;
    let categories = state.engine.categories(user.id, kind).await?;
    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<CategoryResponse>, ServerError> {
    let category = state.engine.category(user.id, category_id).await?;
    Ok(Json(CategoryResponse {
        category: view(category),
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryUpsert>, ServerError>,
) -> Result<(StatusCode, Json<CategoryResponse>), ServerError> {
    let cmd = to_cmd(&user, payload)?;
    let engine = Arc::clone(&state.engine);
    let category = detached(async move { engine.new_category(cmd).await }).await?;
    tracing::info!(category_id = %category.id, "category created");

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            category: view(category),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryUpsert>, ServerError>,
) -> Result<Json<CategoryResponse>, ServerError> {
    let cmd = to_cmd(&user, payload)?;
    let engine = Arc::clone(&state.engine);
    let category = detached(async move { engine.update_category(category_id, cmd).await }).await?;

    Ok(Json(CategoryResponse {
        category: view(category),
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<MessageResponse>, ServerError> {
    let engine = Arc::clone(&state.engine);
    detached(async move { engine.delete_category(user.id, category_id).await }).await?;
    tracing::info!(%category_id, "category deleted");

    Ok(Json(MessageResponse {
        message: "category deleted".to_string(),
    }))
}
