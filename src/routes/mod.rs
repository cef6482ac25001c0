/// Router Module Index
///
/// Organizes the application's routing into access-segregated modules. The
/// split mirrors the three access levels the application knows about, even
/// though every path lives at the top level of the URL space.
///
/// Access control itself is NOT applied here: each handler composes the
/// explicit guard functions (`require_login` / `require_admin`) over the
/// identity resolved by the `MaybeIdentity` extractor. A router-level layer
/// could only reject uniformly, and the rejection differs per route class
/// (anonymous users are redirected to the login view, authenticated
/// non-admins get a 403).

/// Routes accessible to everyone, including anonymous visitors.
pub mod public;

/// Routes gated by `require_login`: post viewing and commenting.
pub mod authenticated;

/// Routes gated by `require_admin`: authoring, editing, deleting posts.
pub mod admin;
