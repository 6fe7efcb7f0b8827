use axum::{
    Router, middleware,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{accounts, auth, auth::TokenSigner, transactions, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenSigner>,
}

impl ServerState {
    pub fn new(engine: Engine, token_secret: &[u8]) -> Self {
        Self {
            engine: Arc::new(engine),
            tokens: Arc::new(TokenSigner::new(token_secret)),
        }
    }
}

/// Builds the application router.
///
/// `POST /users` and `POST /auth/login` are public; everything else sits
/// behind the bearer-token middleware.
pub fn app(state: ServerState) -> Router {
    let protected = Router::new()
        .route(
            "/users/{user_id}",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route(
            "/accounts/{account_id}",
            get(accounts::get)
                .patch(accounts::update)
                .delete(accounts::delete),
        )
        .route(
            "/accounts/{account_id}/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/accounts/{account_id}/transactions/{transaction_id}",
            get(transactions::get),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/users", post(users::create))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, token_secret: &[u8]) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, token_secret, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    token_secret: &[u8],
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, token_secret);

    axum::serve(listener, app(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    token_secret: &[u8],
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;
    let token_secret = token_secret.to_vec();

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, &token_secret, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
