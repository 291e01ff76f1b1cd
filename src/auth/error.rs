// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::VerificationError;

/// Rejection produced by the auth gate.
///
/// Both variants map to 401. The verification reason is kept for audit
/// logging and is never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `x-auth-token` header present
    NoToken,
    /// Token failed verification
    InvalidToken(VerificationError),
}

#[derive(Serialize)]
struct AuthErrorBody {
    msg: &'static str,
}

impl AuthError {
    /// Internal reason code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoToken => "no_token",
            AuthError::InvalidToken(reason) => reason.code(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Message shown to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::NoToken => "Unauthorized access",
            AuthError::InvalidToken(_) => "Invalid Token",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NoToken => write!(f, "x-auth-token header is required"),
            AuthError::InvalidToken(reason) => write!(f, "Invalid token: {reason}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            msg: self.client_message(),
        });
        (self.status_code(), body).into_response()
    }
}
