// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! `require_auth` is mounted with `route_layer` on the protected router:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/posts", get(list_posts))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Public routes live on a separate router and never pass through the gate.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{token::VerificationError, AuthError, TokenService, VerifiedIdentity};
use crate::{audit::AuditEventType, audit_event, state::AppState};

/// Header carrying the bearer token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Decide whether a request may proceed.
///
/// Pure per-request decision: reads the token header, verifies it and
/// returns the identity to attach, or the rejection to send.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<VerifiedIdentity, AuthError> {
    let value = headers.get(AUTH_TOKEN_HEADER).ok_or(AuthError::NoToken)?;
    // A present value that is not visible ASCII is a malformed token.
    let token = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken(VerificationError::Malformed))?
        .trim();
    if token.is_empty() {
        return Err(AuthError::NoToken);
    }

    let claim = tokens.verify(token).map_err(AuthError::InvalidToken)?;
    Ok(VerifiedIdentity::from(claim))
}

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.tokens) {
        Ok(identity) => {
            tracing::debug!(user_id = %identity.user_id, "request authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            audit_event!(AuditEventType::AuthFailure, reason = e.error_code());
            e.into_response()
        }
    }
}
