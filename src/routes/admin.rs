use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Routes reserved for the single administrator. Every handler here opens
/// with `require_admin`, which preserves the rejection asymmetry: no session
/// redirects to the login view, a non-admin session gets a 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET|POST /new-post
        // GET is the authoring-form gate probe; POST creates the post with a
        // server-stamped publish date.
        .route(
            "/new-post",
            get(handlers::new_post_form).post(handlers::create_post),
        )
        // GET|POST /edit/{id}
        // GET returns the post for form prefill; POST applies a partial
        // update. Author and publish date stay immutable.
        .route(
            "/edit/{id}",
            get(handlers::edit_post_form).post(handlers::update_post),
        )
        // GET /delete/{id}
        // Deletes the post (comments cascade with it) and redirects to /.
        .route("/delete/{id}", get(handlers::delete_post))
}
