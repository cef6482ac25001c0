use crate::{
    error::ApiError,
    models::{LoginRequest, RegisterRequest, Role, User},
    password::HasherState,
    repository::RepositoryState,
};

/// UserService
///
/// Registration and login. Passwords are hashed on the way in and only ever
/// compared through the hasher's verify; nothing in this module logs or
/// stores a clear-text password.
#[derive(Clone)]
pub struct UserService {
    repo: RepositoryState,
    hasher: HasherState,
}

impl UserService {
    pub fn new(repo: RepositoryState, hasher: HasherState) -> Self {
        Self { repo, hasher }
    }

    /// register
    ///
    /// Creates a new account. Email uniqueness is exact-match (case matters).
    /// Role bootstrap: the very first account in the store becomes the single
    /// administrator; every later account is a member. The role is written at
    /// creation time and never re-derived from id ordering.
    ///
    /// The caller is expected to establish a session for the returned user
    /// immediately — registering implies logging in.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        if req.email.trim().is_empty() || req.name.trim().is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation("fields can't be empty!".to_string()));
        }

        if self.repo.get_user_by_email(&req.email).await.is_some() {
            return Err(ApiError::Conflict(
                "you're already registered to the site, login instead!".to_string(),
            ));
        }

        let role = if self.repo.count_users().await == 0 {
            Role::Admin
        } else {
            Role::Member
        };

        let password_hash = self.hasher.hash(&req.password)?;

        self.repo
            .create_user(&req.email, &req.name, &password_hash, role)
            .await
            .ok_or(ApiError::Internal)
    }

    /// login
    ///
    /// The two failure modes are distinct on purpose: an email with no
    /// account and a wrong password produce different user-facing messages.
    /// Both leave the user on the login view; neither is fatal.
    pub async fn login(&self, req: LoginRequest) -> Result<User, ApiError> {
        let user = self
            .repo
            .get_user_by_email(&req.email)
            .await
            .ok_or(ApiError::UnknownEmail)?;

        if !self.hasher.verify(&req.password, &user.password_hash) {
            return Err(ApiError::InvalidPassword);
        }

        Ok(user)
    }
}
