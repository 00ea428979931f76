//! Ownership-based access control.
//!
//! Reads are open to everyone, anonymous callers included. Writes need an
//! acting identity, and writes to an existing resource need that identity
//! to be the resource's owner.

use crate::domain::UserId;
use crate::error::DomainError;

/// Kind of access requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// `true` when `actor` may perform `access` on a resource owned by `owner`.
pub fn is_allowed(actor: Option<UserId>, owner: UserId, access: Access) -> bool {
    match access {
        Access::Read => true,
        Access::Write => actor == Some(owner),
    }
}

/// Gate applied to every create, update and delete before any lookup.
pub fn require_authenticated(actor: Option<UserId>) -> Result<UserId, DomainError> {
    actor.ok_or(DomainError::Unauthenticated)
}

/// Like [`is_allowed`], but tells anonymous callers apart from non-owners.
pub fn authorize(actor: Option<UserId>, owner: UserId, access: Access) -> Result<(), DomainError> {
    if is_allowed(actor, owner, access) {
        return Ok(());
    }
    match actor {
        None => Err(DomainError::Unauthenticated),
        Some(_) => Err(DomainError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_always_allowed() {
        assert!(is_allowed(None, 1, Access::Read));
        assert!(is_allowed(Some(2), 1, Access::Read));
        assert!(is_allowed(Some(1), 1, Access::Read));
    }

    #[test]
    fn test_writes_only_for_owner() {
        assert!(is_allowed(Some(1), 1, Access::Write));
        assert!(!is_allowed(Some(2), 1, Access::Write));
        assert!(!is_allowed(None, 1, Access::Write));
    }

    #[test]
    fn test_authorize_distinguishes_anonymous_from_non_owner() {
        assert!(matches!(
            authorize(None, 1, Access::Write),
            Err(DomainError::Unauthenticated)
        ));
        assert!(matches!(
            authorize(Some(2), 1, Access::Write),
            Err(DomainError::Forbidden)
        ));
        assert!(authorize(Some(1), 1, Access::Write).is_ok());
    }

    #[test]
    fn test_require_authenticated() {
        assert_eq!(require_authenticated(Some(5)).unwrap(), 5);
        assert!(matches!(
            require_authenticated(None),
            Err(DomainError::Unauthenticated)
        ));
    }
}
