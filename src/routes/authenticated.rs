use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes for any logged-in user. Every handler here opens with
/// `require_login`, which redirects anonymous requests to the login view.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET|POST /post/{id}
        // GET renders the post detail view (post + comments in creation
        // order). POST adds a comment authored by the session identity.
        .route(
            "/post/{id}",
            get(handlers::show_post).post(handlers::add_comment),
        )
        // GET /delete_comment/{post_id}/{comment_id}
        // Deletes a comment and redirects back to its post. Deliberately has
        // no ownership check (the documented permissive policy): any
        // logged-in user who knows the id pair may delete the comment.
        .route(
            "/delete_comment/{post_id}/{comment_id}",
            get(handlers::delete_comment),
        )
}
