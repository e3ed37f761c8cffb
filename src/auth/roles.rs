//! Authorization guard.
//!
//! A route declares at registration time which roles may call it by handing a
//! `RoleRequirement` to `role_guard`. The decision itself is `authorize`, a pure
//! function of the resolved identity and the requirement.

use std::collections::BTreeSet;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::guard::AuthUser,
    error::{AppError, AppResult},
    models::Role,
};

/// The set of roles permitted to invoke an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: BTreeSet<Role>,
}

impl RoleRequirement {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new([Role::Admin])
    }

    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }
}

/// authorize
///
/// - no requirement: allowed, even without an identity;
/// - requirement but no identity: `MissingIdentity` (the authentication guard was not
///   wired in front of this route);
/// - identity whose role is outside the set: `InsufficientRole`.
pub fn authorize(
    identity: Option<&AuthUser>,
    requirement: Option<&RoleRequirement>,
) -> AppResult<()> {
    let Some(requirement) = requirement else {
        return Ok(());
    };
    let identity = identity.ok_or(AppError::MissingIdentity)?;
    if !requirement.allows(identity.role) {
        tracing::debug!(user_id = identity.id, role = %identity.role, "role requirement not met");
        return Err(AppError::InsufficientRole);
    }
    Ok(())
}

/// role_guard
///
/// Route layer applying `authorize` with the requirement it was registered with.
/// Must sit inside (run after) `auth_middleware`.
pub async fn role_guard(
    State(requirement): State<RoleRequirement>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(request.extensions().get::<AuthUser>(), Some(&requirement))?;
    Ok(next.run(request).await)
}
