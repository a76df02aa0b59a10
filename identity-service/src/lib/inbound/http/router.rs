use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::forgot_password::forgot_password;
use super::handlers::get_user::get_user;
use super::handlers::get_user_by_email::get_user_by_email;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::login_google::login_google;
use super::handlers::logout::logout;
use super::handlers::renew_token::renew_token;
use super::handlers::reset_password::reset_password;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::credentials::ports::AuthServicePort;
use crate::domain::credentials::ports::RevocationStore;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub authenticator: Arc<Authenticator>,
    /// Consulted by the request gate only when revocation is enforced
    pub revocations: Option<Arc<dyn RevocationStore>>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    auth_service: Arc<dyn AuthServicePort>,
    authenticator: Arc<Authenticator>,
    revocations: Option<Arc<dyn RevocationStore>>,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
        authenticator,
        revocations,
    };

    let public_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/login-google", post(login_google))
        .route("/auth/logout", post(logout))
        .route("/auth/renew-token", post(renew_token))
        .route("/auth/forgot-password/:email", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/users", post(create_user));

    let protected_routes = Router::new()
        .route("/users", get(list_users))
        .route("/users/email/:email", get(get_user_by_email))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
