//! Role checks on validated access claims.
//!
//! Roles form a simple ladder: `admin` (2) > `editor` (1) > `user` (0).

use newsportal_models::Role;

use crate::claims::AccessClaims;
use crate::error::AuthError;

/// True when the claims carry one of `allowed`.
pub fn require_role(claims: &AccessClaims, allowed: &[Role]) -> bool {
    allowed.contains(&claims.role)
}

pub fn check_any_role(claims: &AccessClaims, allowed: &[Role]) -> Result<(), AuthError> {
    if require_role(claims, allowed) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

pub fn role_hierarchy_level(role: Role) -> u8 {
    match role {
        Role::Admin => 2,
        Role::Editor => 1,
        Role::User => 0,
    }
}

/// Passes when the caller's role is at least `minimum` on the ladder.
pub fn check_role_hierarchy(claims: &AccessClaims, minimum: Role) -> Result<(), AuthError> {
    if role_hierarchy_level(claims.role) >= role_hierarchy_level(minimum) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
