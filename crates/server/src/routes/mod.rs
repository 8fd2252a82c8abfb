//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - "API Working"
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//! GET  /images/{file}          - Uploaded food images
//!
//! # Accounts
//! POST /api/user/register      - Create account, returns token
//! POST /api/user/login         - Log in, returns token
//!
//! # Cart (requires auth)
//! POST /api/cart/add           - Increment an item
//! POST /api/cart/remove        - Decrement an item
//! POST /api/cart/get           - Current cart
//!
//! # Food
//! POST /api/food/add           - Multipart upload (requires auth)
//! GET  /api/food/list          - Whole menu
//! POST /api/food/remove        - Delete an entry (requires auth)
//!
//! # Orders
//! POST /api/order/place        - Place an order (requires auth)
//! POST /api/order/verify       - Payment callback
//! POST /api/order/status       - Overwrite status (requires auth)
//! POST /api/order/userorders   - Caller's orders (requires auth)
//! GET  /api/order/list         - All orders (requires auth)
//! GET  /api/order/{orderId}    - One of the caller's orders (requires auth)
//! ```

pub mod cart;
pub mod food;
pub mod order;
pub mod user;

use std::str::FromStr;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/get", post(cart::get))
}

/// Create the food catalog routes router.
pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add",
            post(food::add).layer(DefaultBodyLimit::max(food::MAX_UPLOAD_BYTES)),
        )
        .route("/list", get(food::list))
        .route("/remove", post(food::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/place", post(order::place))
        .route("/verify", post(order::verify))
        .route("/status", post(order::update_status))
        .route("/userorders", post(order::user_orders))
        .route("/list", get(order::list))
        .route("/{order_id}", get(order::show))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/user", user_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/food", food_routes())
        .nest("/api/order", order_routes())
}

/// The complete application: API, health checks, image files and the
/// request tracing stack.
pub fn app(state: AppState) -> Router {
    let images = ServeDir::new(state.uploads().path());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/images", images)
        .fallback(not_found)
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(CorsLayer::permissive())
}

async fn root() -> &'static str {
    "API Working"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.stores().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_owned())
}

/// Parse an identifier sent by the client, rejecting garbage as a bad request.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {what}: {raw:?}")))
}
