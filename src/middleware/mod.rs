//! Authentication and authorization extractors.
//!
//! 1. The client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] validates the JWT and extracts the claims
//! 3. The role extractors in [`role`] check the role claim against the
//!    operation's allow-list
//! 4. The handler runs only if every check passed

pub mod auth;
pub mod role;
