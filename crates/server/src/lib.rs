use std::future::Future;

use api_types::ErrorResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::{EngineError, TransactionKind};

pub use server::{ServerState, app, run_with_listener};

mod categories;
mod server;
mod transactions;
mod wallets;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// A background task died before reporting back.
    Internal(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_)
        | EngineError::InvalidKind(_)
        | EngineError::InvalidCurrency(_)
        | EngineError::InvalidRange(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            internal_error()
        }
        err if err.is_validation() => ErrorResponse {
            error: "validation failed".to_string(),
            errors: err.messages(),
        },
        EngineError::KeyNotFound(what) => ErrorResponse {
            error: what,
            errors: Vec::new(),
        },
        other => ErrorResponse {
            error: other.to_string(),
            errors: Vec::new(),
        },
    }
}

fn internal_error() -> ErrorResponse {
    ErrorResponse {
        error: "internal server error".to_string(),
        errors: Vec::new(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                (StatusCode::INTERNAL_SERVER_ERROR, internal_error())
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Malformed bodies, query strings and path segments are reported as
/// validation failures carrying axum's own description.
macro_rules! impl_from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for ServerError {
                fn from(rejection: $rejection) -> Self {
                    Self::Engine(EngineError::Validation(vec![rejection.body_text()]))
                }
            }
        )+
    };
}

impl_from_rejection!(JsonRejection, QueryRejection, PathRejection);

pub(crate) fn parse_kind(raw: &str) -> Result<TransactionKind, ServerError> {
    TransactionKind::try_from(raw).map_err(ServerError::from)
}

/// Runs a mutation on its own task.
///
/// Once started, the mutation and its balance recalculation finish even if
/// the client goes away and the handler future is dropped.
pub(crate) async fn detached<T, F>(mutation: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, EngineError>> + Send + 'static,
{
    tokio::spawn(mutation)
        .await
        .map_err(|err| ServerError::Internal(format!("mutation task failed: {err}")))?
        .map_err(ServerError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn bad_kind_maps_to_400() {
        let res = parse_kind("transfer").unwrap_err().into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validation_lists_every_message() {
        let res = ServerError::from(EngineError::Validation(vec![
            "wallet name is required".to_string(),
            "amount must be greater than 0".to_string(),
        ]))
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({
                "error": "validation failed",
                "errors": ["wallet name is required", "amount must be greater than 0"],
            })
        );
    }

    #[tokio::test]
    async fn database_error_is_not_leaked() {
        let err = EngineError::Database(sea_orm::DbErr::Custom(
            "SELECT secret FROM users".to_string(),
        ));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "error": "internal server error" })
        );
    }

    #[tokio::test]
    async fn detached_reports_engine_errors() {
        let res = detached(async { Err::<(), _>(EngineError::KeyNotFound("w".to_string())) }).await;
        assert!(matches!(res, Err(ServerError::Engine(EngineError::KeyNotFound(_)))));
    }
}
