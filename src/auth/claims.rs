// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity claims carried inside tokens and attached to requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity claim embedded in a token.
///
/// Holds only an opaque reference to a user record, never secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub user_id: String,
}

impl Claim {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Wire form of the token payload: `{"user":{"id":..},"iat":..,"exp":..}`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    pub user: UserRef,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Absolute expiry (Unix seconds)
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UserRef {
    pub id: String,
}

/// Verified identity attached to a request by the auth gate.
///
/// Lives in the request extensions for the duration of one request and is
/// never persisted. Handlers trust it unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VerifiedIdentity {
    /// Identifier of the authenticated user record
    pub user_id: String,
}

impl From<Claim> for VerifiedIdentity {
    fn from(claim: Claim) -> Self {
        Self {
            user_id: claim.user_id,
        }
    }
}
