use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod services;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use password::{Argon2Hasher, HasherState};
pub use repository::{RepositoryState, SqliteRepository};
pub use services::{CommentService, PostService, UserService};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the
/// application by aggregating all annotated handler paths and schemas.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_form, handlers::register, handlers::login_form, handlers::login,
        handlers::logout, handlers::list_posts, handlers::show_post, handlers::add_comment,
        handlers::new_post_form, handlers::create_post, handlers::edit_post_form,
        handlers::update_post, handlers::delete_post, handlers::delete_comment,
        handlers::about, handlers::contact
    ),
    components(
        schemas(
            models::User, models::Role, models::Post, models::Comment, models::PostPage,
            models::RegisterRequest, models::LoginRequest, models::SessionResponse,
            models::CreatePostRequest, models::UpdatePostRequest, models::CreateCommentRequest,
        )
    ),
    tags(
        (name = "blog-engine", description = "Blog publishing API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across all incoming requests. The
/// services are thin `Arc`-backed handles, so cloning the state per request
/// is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Repository handle, also needed directly by the identity extractor.
    pub repo: RepositoryState,
    /// Registration and login.
    pub users: UserService,
    /// Post CRUD (admin-gated by the handlers).
    pub posts: PostService,
    /// Comment create/list/delete (login-gated by the handlers).
    pub comments: CommentService,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Wires the full service stack over a repository and hasher.
    pub fn new(repo: RepositoryState, hasher: HasherState, config: AppConfig) -> Self {
        Self {
            users: UserService::new(repo.clone(), hasher),
            posts: PostService::new(repo.clone()),
            comments: CommentService::new(repo.clone()),
            repo,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// These implementations let the identity extractor pull exactly the
// components it needs from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    // Guard composition happens inside the handlers (see routes::mod), so the
    // three routers merge without per-router middleware.
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(admin::admin_routes())
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in
                // a span correlated by the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer (applied last).
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line for
/// a single request is correlated by a unique id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
