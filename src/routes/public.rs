use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Public Router Module
///
/// Endpoints reachable without a session: the identity flow (register,
/// login, logout), the post index, and the static informational pages.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks.
        .route("/health", get(|| async { "ok" }))
        // GET|POST /register
        // GET describes the form; POST creates the account and establishes
        // the session (registering implies logging in). The first account
        // ever registered becomes the administrator.
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        // GET|POST /login
        // GET describes the form; POST authenticates and sets the session
        // cookie. Unknown-email and wrong-password failures are distinct.
        .route("/login", get(handlers::login_form).post(handlers::login))
        // GET /logout
        // Clears the session cookie unconditionally and redirects to /.
        .route("/logout", get(handlers::logout))
        // GET /
        // The index view: all posts in creation order, queried per request.
        .route("/", get(handlers::list_posts))
        // GET /about, GET /contact
        // Static informational views with no core logic behind them.
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
}
