use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{
    AuthConfig, ServerError, TokenService, catalog, daily, ledger, reports, users,
};
use api_types::Health;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenService>,
}

impl ServerState {
    pub fn new(engine: Engine, auth: &AuthConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            tokens: Arc::new(TokenService::new(auth)),
        }
    }
}

/// Access gate: resolves the bearer token into an [`engine::Actor`] request
/// extension. Handlers behind it never see an anonymous caller.
async fn auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ServerError::Unauthorized("missing bearer token".to_string()));
    };
    let actor = state.tokens.verify(bearer.token())?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

async fn not_found() -> ServerError {
    ServerError::NotFound("route not found".to_string())
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(users::register))
        .route("/auth/login", post(users::login));

    let protected = Router::new()
        .route(
            "/auth/profile",
            get(users::profile).put(users::update_profile),
        )
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", put(users::update).delete(users::delete))
        .route(
            "/consumables",
            get(catalog::list_consumables).post(catalog::create_consumable),
        )
        .route(
            "/consumables/{id}",
            put(catalog::update_consumable).delete(catalog::delete_consumable),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        .route("/daily/consumables", post(daily::save_usage))
        .route(
            "/daily/consumables/{key}",
            get(daily::list_usage)
                .put(daily::update_usage)
                .delete(daily::delete_usage),
        )
        .route("/daily/baguettes", post(daily::save_baguettes))
        .route("/daily/baguettes/{date}", get(daily::baguettes))
        .route("/daily/earnings", post(daily::save_earnings))
        .route("/daily/earnings/{date}", get(daily::earnings))
        .route("/daily/summary/{date}", get(daily::summary))
        .route("/daily/reconcile", post(daily::repair_pending))
        .route("/daily/reconcile/{date}", post(daily::reconcile))
        .route("/reports/weekly/{date}", get(reports::weekly))
        .route(
            "/purchases",
            get(ledger::list_purchases).post(ledger::create_purchase),
        )
        .route("/sales", get(ledger::list_sales).post(ledger::create_sale))
        .route(
            "/expenses",
            get(ledger::list_expenses).post(ledger::create_expense),
        )
        .route(
            "/leftovers",
            get(ledger::leftovers).post(ledger::save_leftovers),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .nest("/api", public.merge(protected))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
