// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the DevConnector API.
//!
//! ## Auth Flow
//!
//! 1. Client registers (`POST /api/users`) or logs in (`POST /api/auth`)
//!    and receives `{"token": "<jwt>"}`
//! 2. Client sends `x-auth-token: <jwt>` on every protected request
//! 3. Server:
//!    - Verifies the HS256 signature against the configured secret
//!    - Rejects the token at or after its `exp`
//!    - Attaches `VerifiedIdentity { user_id }` to the request
//!
//! ## Security
//!
//! - The signing secret is injected once at startup and never logged
//! - All rejections are a uniform 401; the reason only reaches audit logs
//! - Tokens carry no revocation state; rotating the secret revokes them all

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{Claim, VerifiedIdentity};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::{authenticate, require_auth, AUTH_TOKEN_HEADER};
pub use token::{ConfigurationError, Token, TokenService, VerificationError};
