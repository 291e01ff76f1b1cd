// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for author-only operations.
//!
//! Deleting a post or editing a comment is only allowed for the user who
//! wrote it. Reads are public to every authenticated user.

use crate::auth::VerifiedIdentity;

/// Ownership check failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {user_id} does not own {resource} {resource_id}")]
pub struct PermissionDenied {
    pub user_id: String,
    pub resource: &'static str,
    pub resource_id: String,
}

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Resource type name used in errors and audit events.
    const RESOURCE: &'static str;

    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;

    /// Identifier of this resource.
    fn resource_id(&self) -> &str;
}

/// Trait for enforcing ownership.
pub trait OwnershipEnforcer {
    /// Verify that the caller owns this resource.
    ///
    /// # Errors
    /// Returns `PermissionDenied` if the caller doesn't own the resource.
    fn verify_ownership(&self, identity: &VerifiedIdentity) -> Result<(), PermissionDenied>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, identity: &VerifiedIdentity) -> Result<(), PermissionDenied> {
        if self.owner_user_id() == identity.user_id {
            Ok(())
        } else {
            Err(PermissionDenied {
                user_id: identity.user_id.clone(),
                resource: T::RESOURCE,
                resource_id: self.resource_id().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        id: String,
        owner: String,
    }

    impl OwnedResource for Note {
        const RESOURCE: &'static str = "note";

        fn owner_user_id(&self) -> &str {
            &self.owner
        }

        fn resource_id(&self) -> &str {
            &self.id
        }
    }

    fn identity(user_id: &str) -> VerifiedIdentity {
        VerifiedIdentity {
            user_id: user_id.to_string(),
        }
    }

    #[test]
    fn owner_passes() {
        let note = Note {
            id: "n1".into(),
            owner: "u1".into(),
        };
        assert!(note.verify_ownership(&identity("u1")).is_ok());
    }

    #[test]
    fn non_owner_is_denied() {
        let note = Note {
            id: "n1".into(),
            owner: "u1".into(),
        };
        let err = note.verify_ownership(&identity("u2")).unwrap_err();
        assert_eq!(err.resource, "note");
        assert_eq!(err.resource_id, "n1");
        assert_eq!(err.user_id, "u2");
    }
}
