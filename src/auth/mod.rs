//! Authentication and authorization pipeline.
//!
//! Request flow: `guard` (who is calling) → `roles` (may they call this) → handler.
//! `token` is shared by `service` (issuing) and `guard` (verifying).

pub mod guard;
pub mod roles;
pub mod service;
pub mod token;

pub use guard::{AuthUser, auth_middleware, authenticate, bearer_token};
pub use roles::{RoleRequirement, authorize, role_guard};
pub use service::{AuthService, AuthServiceState};
pub use token::{Claims, TokenError, TokenService, TokenServiceState, TokenType};
