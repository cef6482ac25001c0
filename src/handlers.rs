use crate::{
    AppState,
    auth::{self, MaybeIdentity, require_admin, require_login},
    error::ApiError,
    models::{
        Comment, CreateCommentRequest, CreatePostRequest, LoginRequest, Post, PostPage,
        RegisterRequest, SessionResponse, UpdatePostRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
};
use serde_json::json;

// --- Identity & Session Handlers ---

/// register_form
///
/// [Public Route] Describes the registration form's fields. Template
/// rendering is an external collaborator; this endpoint only tells a client
/// what to submit.
#[utoipa::path(
    get,
    path = "/register",
    responses((status = 200, description = "Registration form descriptor"))
)]
pub async fn register_form() -> Json<serde_json::Value> {
    Json(json!({ "fields": ["email", "name", "password"] }))
}

/// register
///
/// [Public Route] Creates a new account and immediately establishes a
/// session — registering implies logging in. The first account ever created
/// becomes the administrator (bootstrap rule in the user service).
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered and logged in", body = SessionResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.register(payload).await?;
    let token = auth::issue_session(&user, &state.config)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, auth::session_cookie(&token))],
        Json(SessionResponse { token, user }),
    ))
}

/// login_form
///
/// [Public Route] Describes the login form's fields.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login form descriptor"))
)]
pub async fn login_form() -> Json<serde_json::Value> {
    Json(json!({ "fields": ["email", "password"] }))
}

/// login
///
/// [Public Route] Authenticates an existing account and establishes a
/// session. An unknown email and a wrong password are rejected with
/// distinct messages (both 401, both non-fatal).
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "Unknown email or invalid password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.login(payload).await?;
    let token = auth::issue_session(&user, &state.config)?;

    Ok((
        [(header::SET_COOKIE, auth::session_cookie(&token))],
        Json(SessionResponse { token, user }),
    ))
}

/// logout
///
/// [Public Route] Clears the session cookie unconditionally — even when no
/// session existed — and redirects to the index.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 303, description = "Session cleared, redirected to index"))
)]
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Redirect::to("/"),
    )
}

// --- Post Handlers ---

/// list_posts
///
/// [Public Route] The index view: every post in creation order, read from
/// the store on each request.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "All posts", body = [Post]))
)]
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.posts.list_all().await)
}

/// show_post
///
/// [Login Route] The detail view for one post: the post plus its comments.
/// Anonymous requests are redirected to the login view.
#[utoipa::path(
    get,
    path = "/post/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post with comments", body = PostPage),
        (status = 404, description = "No such post")
    )
)]
pub async fn show_post(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostPage>, ApiError> {
    require_login(&identity)?;

    let post = state.posts.get(id).await?;
    let comments = state.comments.list_for_post(id).await;

    Ok(Json(PostPage { post, comments }))
}

/// add_comment
///
/// [Login Route] Posts a new comment on a post while viewing it. The author
/// is taken from the session identity, never from the payload.
#[utoipa::path(
    post,
    path = "/post/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 404, description = "No such post")
    )
)]
pub async fn add_comment(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = require_login(&identity)?;

    let comment = state
        .comments
        .create(identity.id, post_id, &payload.text)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// new_post_form
///
/// [Admin Route] Gate probe for the authoring form. Exists so a client can
/// learn whether to show the editor before submitting anything.
#[utoipa::path(
    get,
    path = "/new-post",
    responses(
        (status = 200, description = "Authoring form descriptor"),
        (status = 403, description = "Not the administrator")
    )
)]
pub async fn new_post_form(identity: MaybeIdentity) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&identity)?;
    Ok(Json(json!({
        "fields": ["title", "subtitle", "body", "img_url"]
    })))
}

/// create_post
///
/// [Admin Route] Authors a new post. The publish date is stamped by the
/// service from the server clock.
#[utoipa::path(
    post,
    path = "/new-post",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = Post),
        (status = 400, description = "Empty or duplicate title"),
        (status = 403, description = "Not the administrator")
    )
)]
pub async fn create_post(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = require_admin(&identity)?;

    let post = state.posts.create(identity.id, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// edit_post_form
///
/// [Admin Route] Returns the current post for prefilling the edit form.
#[utoipa::path(
    get,
    path = "/edit/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post to edit", body = Post),
        (status = 404, description = "No such post")
    )
)]
pub async fn edit_post_form(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Post>, ApiError> {
    require_admin(&identity)?;
    Ok(Json(state.posts.get(id).await?))
}

/// update_post
///
/// [Admin Route] Edits a post's title/subtitle/body/image. Author and
/// publish date are immutable after creation.
#[utoipa::path(
    post,
    path = "/edit/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 404, description = "No such post")
    )
)]
pub async fn update_post(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    require_admin(&identity)?;
    Ok(Json(state.posts.update(id, payload).await?))
}

/// delete_post
///
/// [Admin Route] Deletes a post and (via the schema cascade) its comments,
/// then redirects to the index.
#[utoipa::path(
    get,
    path = "/delete/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 303, description = "Deleted, redirected to index"),
        (status = 404, description = "No such post")
    )
)]
pub async fn delete_post(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, ApiError> {
    require_admin(&identity)?;
    state.posts.delete(id).await?;
    Ok(Redirect::to("/"))
}

/// delete_comment
///
/// [Login Route] Deletes a comment by id and redirects back to its post.
/// Any logged-in user may delete any comment — the documented permissive
/// policy, not an oversight (see the comment service).
#[utoipa::path(
    get,
    path = "/delete_comment/{post_id}/{comment_id}",
    params(
        ("post_id" = i64, Path, description = "Parent post ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 303, description = "Deleted, redirected to the post"),
        (status = 404, description = "No such comment")
    )
)]
pub async fn delete_comment(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Redirect, ApiError> {
    require_login(&identity)?;
    state.comments.delete(comment_id).await?;
    Ok(Redirect::to(&format!("/post/{post_id}")))
}

// --- Static Informational Views ---

/// about
///
/// [Public Route] Static informational payload; no core logic.
#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "About the blog"))
)]
pub async fn about() -> Json<serde_json::Value> {
    Json(json!({ "page": "about", "text": "A small blog about things worth writing down." }))
}

/// contact
///
/// [Public Route] Static informational payload; no core logic.
#[utoipa::path(
    get,
    path = "/contact",
    responses((status = 200, description = "Contact details"))
)]
pub async fn contact() -> Json<serde_json::Value> {
    Json(json!({ "page": "contact", "email": "hello@example.com" }))
}
