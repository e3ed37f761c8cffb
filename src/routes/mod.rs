/// Router Module Index
///
/// Routes are split by the guard chain they sit behind. The guards themselves are
/// attached in `create_router`, per module, so a route's protection is decided by
/// which module registers it.

/// Routes open to anonymous callers: health and the auth entry points.
pub mod public;

/// Routes behind the authentication guard.
pub mod authenticated;

/// Routes behind the authentication guard and the `{admin}` role requirement.
pub mod admin;
