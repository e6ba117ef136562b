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

use super::handlers::add_tags::add_tags;
use super::handlers::create_blog::create_blog;
use super::handlers::delete_blog::delete_blog;
use super::handlers::get_blog::get_blog;
use super::handlers::get_profile::get_profile;
use super::handlers::list_blogs::list_blogs;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::remove_tags::remove_tags;
use super::handlers::token::issue_token;
use super::handlers::update_blog::update_blog;
use super::handlers::update_profile::update_profile;
use super::middleware::authenticate as auth_middleware;
use crate::domain::blog::ports::BlogServicePort;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub blog_service: Arc<dyn BlogServicePort>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    blog_service: Arc<dyn BlogServicePort>,
) -> Router {
    let state = AppState {
        auth_service,
        blog_service,
    };

    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token", post(issue_token))
        .route("/blogs", get(list_blogs))
        .route("/blogs/:title", get(get_blog));

    let protected_routes = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/tags/add", post(add_tags))
        .route("/tags/remove", post(remove_tags))
        .route("/blogs", post(create_blog))
        .route("/blogs/:title", put(update_blog).delete(delete_blog))
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
