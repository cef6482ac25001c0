use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// The RBAC field stored on every user row. There are exactly two roles:
/// the single administrator (the first account ever registered) and everyone
/// else. The role is assigned explicitly at registration time and never
/// re-derived from id ordering afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

/// User
///
/// The canonical identity record stored in the `users` table. The password
/// hash is an opaque PHC string and is never serialized into any response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct User {
    pub id: i64,
    // The user's primary identifier. Unique, compared exact-match (case-sensitive).
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    // Display name shown next to posts and comments.
    pub name: String,
    pub role: Role,
}

impl User {
    /// Whether this user holds the single distinguished admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Post
///
/// A blog post record from the `posts` table. This is the primary data
/// structure for the core business logic.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Post {
    pub id: i64,
    // FK to users.id (the admin who authored it). Immutable after creation.
    pub author_id: i64,
    // Unique across all posts; enforced by the store and re-checked by the service.
    pub title: String,
    pub subtitle: String,
    // Opaque rich content; the engine stores and returns it verbatim.
    pub body: String,
    pub img_url: String,
    // Human-formatted publish date ("Month DD, YYYY"), set from the server
    // clock at creation and immutable afterwards. Deliberately not normalized.
    pub date: String,
}

/// Comment
///
/// A comment record from the `comments` table, augmented with the author's
/// display name (loaded via a JOIN in the repository query).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    // FK to posts.id. Rows are removed with their parent post (cascade).
    pub post_id: i64,
    pub text: String,
    #[sqlx(default)]
    pub author_name: Option<String>,
}

/// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for the public registration endpoint (POST /register).
/// The password is hashed immediately and never persisted or logged in clear.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreatePostRequest
///
/// Input payload for authoring a new post (POST /new-post). The author and
/// publish date are not part of the payload: the author comes from the
/// session identity and the date from the server clock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreatePostRequest {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
}

/// UpdatePostRequest
///
/// Partial update payload for modifying an existing post (POST /edit/{id}).
/// Uses `Option<T>` for all fields so only the provided fields are changed;
/// author and date are immutable and therefore absent here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}

/// CreateCommentRequest
///
/// Input payload for posting a new comment (POST /post/{id}).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// --- Response Schemas (Output) ---

/// SessionResponse
///
/// Returned by successful register/login calls. The token is also set as the
/// `session` cookie, so JSON clients and cookie clients both work.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// PostPage
///
/// The detail view for a single post: the post itself plus its comments in
/// creation order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PostPage {
    pub post: Post,
    pub comments: Vec<Comment>,
}
