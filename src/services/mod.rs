/// Service Layer Index
///
/// The services own the business rules (validation, uniqueness, bootstrap
/// role assignment, publish-date stamping) and translate repository absence
/// into the user-facing error taxonomy. They perform **no authorization**:
/// every mutating call trusts that the handler already ran the appropriate
/// guard. This keeps the Allow/Reject decision in exactly one place.

/// Registration, login, and the admin bootstrap rule.
pub mod users;

/// Post CRUD.
pub mod posts;

/// Comments attached to posts.
pub mod comments;

pub use comments::CommentService;
pub use posts::PostService;
pub use users::UserService;
