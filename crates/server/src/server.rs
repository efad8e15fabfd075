use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};
use uuid::Uuid;

use std::sync::Arc;

use crate::{categories, transactions, wallets};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the trusted user id.
///
/// The authentication layer in front of the server verifies credentials and
/// forwards the caller as "x-user-id: <uuid>".
#[derive(Debug)]
struct UserIdHeader(Uuid);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = Uuid::parse_str(value.trim()) else {
            return Err(AxumError::invalid());
        };

        Ok(UserIdHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        let as_string = self.0.to_string();
        match axum::http::HeaderValue::from_str(&as_string) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn auth(
    user_header: Result<TypedHeader<UserIdHeader>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Ok(TypedHeader(UserIdHeader(user_id))) = user_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = match state.engine.user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(%user_id, "request for unknown user");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(err) => {
            tracing::error!("failed to load user {user_id}: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route(
            "/wallets/{id}",
            get(wallets::get)
                .put(wallets::update)
                .delete(wallets::delete),
        )
        .route("/wallets/{id}/recalculate", post(wallets::recalculate))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/summary", get(transactions::summary))
        .route("/transactions/breakdown", get(transactions::breakdown))
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// The full application router around `engine`.
pub fn app(engine: Arc<Engine>) -> Router {
    router(ServerState { engine })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(Arc::new(engine))).await
}
