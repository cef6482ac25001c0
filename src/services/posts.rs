use chrono::Utc;

use crate::{
    error::ApiError,
    models::{CreatePostRequest, Post, UpdatePostRequest},
    repository::RepositoryState,
};

/// PostService
///
/// Post CRUD. All mutating operations assume `require_admin` has already
/// passed in the handler; nothing here inspects the caller's identity beyond
/// recording authorship.
#[derive(Clone)]
pub struct PostService {
    repo: RepositoryState,
}

impl PostService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// list_all
    ///
    /// All posts in creation order. Side-effect-free; queried from the store
    /// on every call.
    pub async fn list_all(&self) -> Vec<Post> {
        self.repo.list_posts().await
    }

    /// get
    pub async fn get(&self, id: i64) -> Result<Post, ApiError> {
        self.repo.get_post(id).await.ok_or(ApiError::NotFound)
    }

    /// create
    ///
    /// Rejects an empty or already-taken title. The publish date is stamped
    /// here from the server clock, formatted "Month DD, YYYY", and is
    /// immutable from then on.
    pub async fn create(&self, author_id: i64, req: CreatePostRequest) -> Result<Post, ApiError> {
        if req.title.trim().is_empty() {
            return Err(ApiError::Validation("title can't be empty!".to_string()));
        }
        if self.repo.get_post_by_title(&req.title).await.is_some() {
            return Err(ApiError::Validation(
                "a post with that title already exists!".to_string(),
            ));
        }

        let date = Utc::now().format("%B %d, %Y").to_string();

        self.repo
            .create_post(
                author_id,
                &req.title,
                &req.subtitle,
                &req.body,
                &req.img_url,
                &date,
            )
            .await
            .ok_or(ApiError::Internal)
    }

    /// update
    ///
    /// Partial update of title/subtitle/body/image. Author and publish date
    /// are immutable after creation. A retitle into an existing title is
    /// rejected the same way creation is.
    pub async fn update(&self, id: i64, req: UpdatePostRequest) -> Result<Post, ApiError> {
        if let Some(title) = &req.title {
            if title.trim().is_empty() {
                return Err(ApiError::Validation("title can't be empty!".to_string()));
            }
            if let Some(existing) = self.repo.get_post_by_title(title).await {
                if existing.id != id {
                    return Err(ApiError::Validation(
                        "a post with that title already exists!".to_string(),
                    ));
                }
            }
        }

        self.repo.update_post(id, req).await.ok_or(ApiError::NotFound)
    }

    /// delete
    ///
    /// Removes the post and, via the schema-level cascade, its comments. The
    /// source application left comments orphaned on post deletion; cascading
    /// here is a deliberate, documented fix.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if self.repo.delete_post(id).await {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }
}
