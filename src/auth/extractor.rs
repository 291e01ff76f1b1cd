// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers that sit behind the gate:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.user_id is the verified user
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::authenticate, AuthError, VerifiedIdentity};
use crate::state::AppState;

/// Extractor for the verified identity of the caller.
///
/// Reads the identity the gate placed in the request extensions. A handler
/// reached without the gate runs the same gate here, so there is no path to
/// a handler that skips verification.
pub struct Auth(pub VerifiedIdentity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<VerifiedIdentity>().cloned() {
            return Ok(Auth(identity));
        }

        let identity = authenticate(&parts.headers, &state.tokens)?;
        parts.extensions.insert(identity.clone());
        Ok(Auth(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claim;
    use crate::state::test_support::test_state;
    use axum::http::Request;

    #[tokio::test]
    async fn auth_extractor_requires_token() {
        let (state, _dir) = test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::NoToken)));
    }

    #[tokio::test]
    async fn auth_extractor_verifies_token() {
        let (state, _dir) = test_state();
        let token = state.tokens.issue(&Claim::new("user_123")).unwrap();
        let mut parts = Request::builder()
            .uri("/test")
            .header("x-auth-token", token.as_str())
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(identity.user_id, "user_123");
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _dir) = test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        parts.extensions.insert(VerifiedIdentity {
            user_id: "user_from_gate".to_string(),
        });

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(identity.user_id, "user_from_gate");
    }
}
