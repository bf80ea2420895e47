use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin_register::admin_register;
use super::handlers::forgot_password::forgot_password;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::resend_verification::resend_verification;
use super::handlers::reset_password::reset_password;
use super::handlers::review_professional::review_professional;
use super::handlers::update_clinic::update_clinic;
use super::handlers::validate::validate;
use super::handlers::verify_email::verify_email;
use super::middleware::require_caller;
use crate::identity::ports::AuthServicePort;

pub struct AppState<S: AuthServicePort> {
    pub auth_service: Arc<S>,
}

impl<S: AuthServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
        }
    }
}

pub fn create_router<S: AuthServicePort>(auth_service: Arc<S>) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/register", post(register::<S>))
        .route("/login", post(login::<S>))
        .route("/validate", get(validate::<S>))
        .route("/verify", get(verify_email::<S>))
        .route("/resend-verification", post(resend_verification::<S>))
        .route("/forgot-password", post(forgot_password::<S>))
        .route("/reset-password", post(reset_password::<S>));

    let caller_routes = Router::new()
        .route("/admin/register", post(admin_register::<S>))
        .route(
            "/admin/users/:user_id/verification",
            put(review_professional::<S>),
        )
        .route("/clinic/update", put(update_clinic::<S>))
        .route_layer(middleware::from_fn(require_caller));

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
        .merge(caller_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
