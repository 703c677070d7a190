//! HTTP server wiring: router, middleware layers, and startup.

use crate::store::Store;
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{delete, get, post, put},
    Extension, Router,
};
use secrecy::SecretString;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod auth;
pub(crate) mod error;
pub(crate) mod handlers;
mod openapi;

use auth::{TokenKeys, AUTH_HEADER};

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, secret: SecretString) -> Result<()> {
    let store = Store::connect(&dsn).await?;
    let keys = TokenKeys::new(&secret);

    let app = router(store, keys);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn router(store: Store, keys: TokenKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(AUTH_HEADER)])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/users", post(handlers::users::register))
        .route(
            "/api/auth",
            get(handlers::auth::me).post(handlers::auth::login),
        )
        .route(
            "/api/profile",
            get(handlers::profile::all_profiles)
                .post(handlers::profile::upsert_profile)
                .delete(handlers::profile::delete_profile),
        )
        .route("/api/profile/me", get(handlers::profile::my_profile))
        .route(
            "/api/profile/user/:user_id",
            get(handlers::profile::profile_by_user),
        )
        .route(
            "/api/profile/experience",
            put(handlers::profile::add_experience),
        )
        .route(
            "/api/profile/experience/:exp_id",
            delete(handlers::profile::remove_experience),
        )
        .route(
            "/api/profile/education",
            put(handlers::profile::add_education),
        )
        .route(
            "/api/profile/education/:edu_id",
            delete(handlers::profile::remove_education),
        )
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(keys))
                .layer(Extension(store)),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
