use blog_engine::{
    AppConfig, AppState, Argon2Hasher, HasherState, SqliteRepository,
    error::ApiError,
    models::{CreatePostRequest, LoginRequest, RegisterRequest, Role, UpdatePostRequest},
    repository::RepositoryState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc};

/// Builds a full service stack over a fresh in-memory SQLite store.
async fn test_state() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    let repository = SqliteRepository::new(pool);
    repository.migrate().await.expect("Failed to apply schema");

    let repo = Arc::new(repository) as RepositoryState;
    let hasher = Arc::new(Argon2Hasher) as HasherState;
    AppState::new(repo, hasher, AppConfig::default())
}

fn register_req(email: &str, name: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        name: name.to_string(),
        password: password.to_string(),
    }
}

fn post_req(title: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        subtitle: "a subtitle".to_string(),
        body: "<p>body</p>".to_string(),
        img_url: "https://example.com/cover.jpg".to_string(),
    }
}

// --- User Service ---

#[tokio::test]
async fn first_registered_user_is_admin_later_users_are_members() {
    let state = test_state().await;

    let first = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw1"))
        .await
        .unwrap();
    let second = state
        .users
        .register(register_req("user@x.com", "User", "pw2"))
        .await
        .unwrap();

    assert_eq!(first.role, Role::Admin);
    assert_eq!(second.role, Role::Member);
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_leaves_one_row() {
    let state = test_state().await;

    state
        .users
        .register(register_req("a@x.com", "Name", "right"))
        .await
        .unwrap();
    let err = state
        .users
        .register(register_req("a@x.com", "Other", "other"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(state.repo.count_users().await, 1);
}

#[tokio::test]
async fn login_after_register_resolves_the_same_identity() {
    let state = test_state().await;

    let registered = state
        .users
        .register(register_req("a@x.com", "Name", "right"))
        .await
        .unwrap();
    let logged_in = state
        .users
        .login(LoginRequest {
            email: "a@x.com".to_string(),
            password: "right".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(logged_in.id, registered.id);
    assert_eq!(logged_in.email, "a@x.com");
}

#[tokio::test]
async fn login_failures_are_distinct() {
    let state = test_state().await;

    state
        .users
        .register(register_req("a@x.com", "Name", "right"))
        .await
        .unwrap();

    let wrong_password = state
        .users
        .login(LoginRequest {
            email: "a@x.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_email = state
        .users
        .login(LoginRequest {
            email: "nobody@x.com".to_string(),
            password: "right".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, ApiError::InvalidPassword));
    assert!(matches!(unknown_email, ApiError::UnknownEmail));
    // The two failures carry different user-facing messages.
    assert_ne!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn password_is_never_stored_in_clear() {
    let state = test_state().await;

    let user = state
        .users
        .register(register_req("a@x.com", "Name", "hunter2"))
        .await
        .unwrap();

    let stored = state.repo.get_user(user.id).await.unwrap();
    assert_ne!(stored.password_hash, "hunter2");
}

// --- Post Service ---

#[tokio::test]
async fn created_post_round_trips_with_a_publish_date() {
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();

    let created = state.posts.create(admin.id, post_req("Hello")).await.unwrap();
    let fetched = state.posts.get(created.id).await.unwrap();

    assert_eq!(fetched.title, "Hello");
    assert_eq!(fetched.subtitle, "a subtitle");
    assert_eq!(fetched.body, "<p>body</p>");
    assert_eq!(fetched.img_url, "https://example.com/cover.jpg");
    assert_eq!(fetched.author_id, admin.id);
    assert!(!fetched.date.is_empty());
}

#[tokio::test]
async fn duplicate_title_is_rejected_and_store_keeps_one_post() {
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();

    state.posts.create(admin.id, post_req("Hello")).await.unwrap();
    let err = state
        .posts
        .create(admin.id, post_req("Hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    let with_title: Vec<_> = state
        .posts
        .list_all()
        .await
        .into_iter()
        .filter(|p| p.title == "Hello")
        .collect();
    assert_eq!(with_title.len(), 1);
}

#[tokio::test]
async fn empty_title_is_rejected() {
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();

    let err = state
        .posts
        .create(admin.id, post_req("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(state.posts.list_all().await.is_empty());
}

#[tokio::test]
async fn update_changes_fields_but_not_author_or_date() {
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();

    let created = state.posts.create(admin.id, post_req("Hello")).await.unwrap();
    let updated = state
        .posts
        .update(
            created.id,
            UpdatePostRequest {
                subtitle: Some("new subtitle".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.subtitle, "new subtitle");
    // Untouched fields survive the partial update.
    assert_eq!(updated.title, "Hello");
    // Author and publish date are immutable.
    assert_eq!(updated.author_id, created.author_id);
    assert_eq!(updated.date, created.date);
}

#[tokio::test]
async fn updating_a_missing_post_is_not_found() {
    let state = test_state().await;
    let err = state
        .posts
        .update(999, UpdatePostRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn deleting_a_post_takes_its_comments_with_it() {
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();

    let post = state.posts.create(admin.id, post_req("Hello")).await.unwrap();
    state
        .comments
        .create(admin.id, post.id, "first!")
        .await
        .unwrap();

    state.posts.delete(post.id).await.unwrap();

    assert!(matches!(
        state.posts.get(post.id).await.unwrap_err(),
        ApiError::NotFound
    ));
    // The cascade removed the orphan-candidate comments.
    assert!(state.comments.list_for_post(post.id).await.is_empty());
}

// --- Comment Service ---

#[tokio::test]
async fn commenting_on_a_missing_post_creates_no_row() {
    let state = test_state().await;
    let user = state
        .users
        .register(register_req("u@x.com", "U", "pw"))
        .await
        .unwrap();

    let err = state
        .comments
        .create(user.id, 42, "hello?")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound));
    assert!(state.comments.list_for_post(42).await.is_empty());
}

#[tokio::test]
async fn empty_comment_text_is_rejected() {
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();
    let post = state.posts.create(admin.id, post_req("Hello")).await.unwrap();

    let err = state
        .comments
        .create(admin.id, post.id, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(state.comments.list_for_post(post.id).await.is_empty());
}

#[tokio::test]
async fn any_logged_in_user_may_delete_any_comment() {
    // The documented permissive policy: deletion has no ownership check.
    let state = test_state().await;
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();
    let post = state.posts.create(admin.id, post_req("Hello")).await.unwrap();
    let comment = state
        .comments
        .create(admin.id, post.id, "mine")
        .await
        .unwrap();

    // A different (non-author) identity has already passed require_login at
    // the handler; the service deletes regardless of authorship.
    state.comments.delete(comment.id).await.unwrap();
    assert!(state.comments.list_for_post(post.id).await.is_empty());

    // Deleting it again is NotFound, not an error cascade.
    assert!(matches!(
        state.comments.delete(comment.id).await.unwrap_err(),
        ApiError::NotFound
    ));
}

// --- End-to-End Scenario (service level) ---

#[tokio::test]
async fn full_publishing_scenario() {
    let state = test_state().await;

    // Admin registers first, authors "Hello".
    let admin = state
        .users
        .register(register_req("admin@x.com", "Admin", "pw"))
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);
    let post = state.posts.create(admin.id, post_req("Hello")).await.unwrap();

    // A second user registers, logs in, and comments.
    let reader = state
        .users
        .register(register_req("reader@x.com", "Reader", "pw2"))
        .await
        .unwrap();
    let reader = state
        .users
        .login(LoginRequest {
            email: "reader@x.com".to_string(),
            password: "pw2".to_string(),
        })
        .await
        .unwrap();

    state
        .comments
        .create(reader.id, post.id, "Nice!")
        .await
        .unwrap();

    let comments = state.comments.list_for_post(post.id).await;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "Nice!");
    assert_eq!(comments[0].author_id, reader.id);
    assert_eq!(comments[0].author_name.as_deref(), Some("Reader"));
}
