use crate::models::{Comment, Post, Role, UpdatePostRequest, User};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Schema applied at startup. Arena-style storage: each entity lives in its
/// own table keyed by id, relationships are plain foreign-key references
/// resolved through explicit lookups (no live object graph anywhere).
/// Comments ride along with their parent post via ON DELETE CASCADE, so a
/// post delete stays a single statement.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name          TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'member'
);

CREATE TABLE IF NOT EXISTS posts (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL REFERENCES users(id),
    title     TEXT NOT NULL UNIQUE,
    subtitle  TEXT NOT NULL,
    body      TEXT NOT NULL,
    img_url   TEXT NOT NULL,
    date      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL REFERENCES users(id),
    post_id   INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    text      TEXT NOT NULL
);
"#;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. Handlers and
/// services interact with the data layer through this trait without knowing
/// the concrete implementation.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn BlogRepository>`) safely shareable across Axum's asynchronous
/// task boundaries.
///
/// Error philosophy: read methods collapse infrastructure failures into
/// `None`/empty after logging them; write methods return `Option`/`bool` the
/// same way. The services layer owns translating absence into the user-facing
/// error taxonomy.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    // --- Users ---
    async fn count_users(&self) -> i64;
    async fn get_user(&self, id: i64) -> Option<User>;
    async fn get_user_by_email(&self, email: &str) -> Option<User>;
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Option<User>;

    // --- Posts ---
    // Full listing in creation order. Queried per request: there is no
    // process-wide post cache.
    async fn list_posts(&self) -> Vec<Post>;
    async fn get_post(&self, id: i64) -> Option<Post>;
    async fn get_post_by_title(&self, title: &str) -> Option<Post>;
    async fn create_post(
        &self,
        author_id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
        date: &str,
    ) -> Option<Post>;
    // Partial update via COALESCE; author_id and date are never touched.
    async fn update_post(&self, id: i64, req: UpdatePostRequest) -> Option<Post>;
    // Returns true if a row was deleted. Comments cascade at the schema level.
    async fn delete_post(&self, id: i64) -> bool;

    // --- Comments ---
    async fn list_comments(&self, post_id: i64) -> Vec<Comment>;
    async fn create_comment(&self, author_id: i64, post_id: i64, text: &str) -> Option<Comment>;
    async fn delete_comment(&self, id: i64) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn BlogRepository>;

/// SqliteRepository
///
/// The concrete implementation of the `BlogRepository` trait, backed by SQLite.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies the schema. Idempotent; run once at startup before the server
    /// accepts traffic.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BlogRepository for SqliteRepository {
    /// count_users
    ///
    /// Used by the registration bootstrap: the first account ever created is
    /// assigned the admin role.
    async fn count_users(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("count_users error: {:?}", e);
                0
            })
    }

    /// get_user
    ///
    /// Retrieves a user row by id. Used by the identity extractor to confirm
    /// the session subject still exists.
    async fn get_user(&self, id: i64) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user error: {:?}", e);
            None
        })
    }

    /// get_user_by_email
    ///
    /// Exact-match lookup (case-sensitive by design). Used by registration
    /// conflict detection and login.
    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_by_email error: {:?}", e);
            None
        })
    }

    /// create_user
    ///
    /// Inserts a new user row. The UNIQUE constraint on email backs up the
    /// service-level conflict check; a constraint violation lands here as a
    /// logged error and `None`.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Option<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (email, password_hash, name, role)
               VALUES (?1, ?2, ?3, ?4)
               RETURNING id, email, password_hash, name, role"#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_user error: {:?}", e);
            None
        })
    }

    /// list_posts
    ///
    /// Full listing in creation order (ascending id). Always hits the store;
    /// the index view can never go stale relative to edits or deletes.
    async fn list_posts(&self) -> Vec<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, subtitle, body, img_url, date FROM posts ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_posts error: {:?}", e);
            vec![]
        })
    }

    /// get_post
    ///
    /// Simple retrieval of any post by id.
    async fn get_post(&self, id: i64) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, subtitle, body, img_url, date FROM posts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post error: {:?}", e);
            None
        })
    }

    /// get_post_by_title
    ///
    /// Used by the post service to reject duplicate titles before insert.
    async fn get_post_by_title(&self, title: &str) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, subtitle, body, img_url, date FROM posts WHERE title = ?1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post_by_title error: {:?}", e);
            None
        })
    }

    /// create_post
    ///
    /// Inserts a new post. The publish date arrives pre-formatted from the
    /// service; the repository treats it as an opaque string.
    async fn create_post(
        &self,
        author_id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
        date: &str,
    ) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"INSERT INTO posts (author_id, title, subtitle, body, img_url, date)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)
               RETURNING id, author_id, title, subtitle, body, img_url, date"#,
        )
        .bind(author_id)
        .bind(title)
        .bind(subtitle)
        .bind(body)
        .bind(img_url)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_post error: {:?}", e);
            None
        })
    }

    /// update_post
    ///
    /// Uses COALESCE to efficiently handle `Option<T>` fields, only updating
    /// a column if the corresponding field in `req` is `Some`. Author and
    /// publish date are immutable and deliberately absent from the statement.
    async fn update_post(&self, id: i64, req: UpdatePostRequest) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE(?2, title),
                subtitle = COALESCE(?3, subtitle),
                body = COALESCE(?4, body),
                img_url = COALESCE(?5, img_url)
            WHERE id = ?1
            RETURNING id, author_id, title, subtitle, body, img_url, date
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.subtitle)
        .bind(req.body)
        .bind(req.img_url)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_post error: {:?}", e);
            None
        })
    }

    /// delete_post
    ///
    /// Single-statement delete; the comments table's ON DELETE CASCADE takes
    /// the children with it.
    async fn delete_post(&self, id: i64) -> bool {
        match sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_post error: {:?}", e);
                false
            }
        }
    }

    /// list_comments
    ///
    /// Retrieves all comments for a post in creation order, joined with
    /// `users` to enrich each row with the author's display name.
    async fn list_comments(&self, post_id: i64) -> Vec<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.author_id, c.post_id, c.text, u.name AS author_name
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.post_id = ?1
            ORDER BY c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_comments error: {:?}", e);
            vec![]
        })
    }

    /// create_comment
    ///
    /// Inserts a comment and re-reads the author's name for the enriched
    /// response. Existence of the parent post is the service's concern.
    async fn create_comment(&self, author_id: i64, post_id: i64, text: &str) -> Option<Comment> {
        let mut comment = sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (author_id, post_id, text)
               VALUES (?1, ?2, ?3)
               RETURNING id, author_id, post_id, text, NULL AS author_name"#,
        )
        .bind(author_id)
        .bind(post_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_comment error: {:?}", e);
            None
        })?;

        comment.author_name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = ?1")
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("create_comment author lookup error: {:?}", e);
                None
            });

        Some(comment)
    }

    /// delete_comment
    ///
    /// Deletes a comment by id. No ownership condition here: the permissive
    /// any-logged-in-user policy is decided one layer up.
    async fn delete_comment(&self, id: i64) -> bool {
        match sqlx::query("DELETE FROM comments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_comment error: {:?}", e);
                false
            }
        }
    }
}
