use crate::{
    error::ApiError,
    models::Comment,
    repository::RepositoryState,
};

/// CommentService
///
/// Comments attached to posts. Creation requires `require_login` to have
/// passed in the handler; the service only enforces data rules.
#[derive(Clone)]
pub struct CommentService {
    repo: RepositoryState,
}

impl CommentService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// list_for_post
    ///
    /// All comments on a post in creation order, enriched with each author's
    /// display name.
    pub async fn list_for_post(&self, post_id: i64) -> Vec<Comment> {
        self.repo.list_comments(post_id).await
    }

    /// create
    ///
    /// Rejects empty text, and a post id that does not resolve. The parent
    /// check runs before the insert so a failed create leaves no row behind.
    pub async fn create(
        &self,
        author_id: i64,
        post_id: i64,
        text: &str,
    ) -> Result<Comment, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("comment can't be empty!".to_string()));
        }
        if self.repo.get_post(post_id).await.is_none() {
            return Err(ApiError::NotFound);
        }

        self.repo
            .create_comment(author_id, post_id, text)
            .await
            .ok_or(ApiError::Internal)
    }

    /// delete
    ///
    /// Deletes any comment by id. There is deliberately **no ownership or
    /// admin check**: any logged-in user who knows a comment id may remove
    /// it. This reproduces the source application's policy as documented
    /// behavior; see DESIGN.md before tightening it.
    pub async fn delete(&self, comment_id: i64) -> Result<(), ApiError> {
        if self.repo.delete_comment(comment_id).await {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }
}
