// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP-facing error type.
//!
//! Two body shapes reach clients:
//!
//! - `{"msg": "..."}` for most failures
//! - `{"errors": [{"param": "...", "msg": "..."}]}` for request validation

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::storage::DbError;

/// One failed validation rule.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    /// Offending request field, absent for request-wide errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    pub msg: String,
}

impl FieldError {
    pub fn new(param: &str, msg: impl Into<String>) -> Self {
        Self {
            param: Some(param.to_string()),
            msg: msg.into(),
        }
    }

    /// An error not tied to a single field.
    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            param: None,
            msg: msg.into(),
        }
    }
}

/// `{"msg": ...}` body.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// `{"errors": [...]}` body.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Non-empty for validation failures
    pub errors: Vec<FieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 400 with an `errors` list.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = errors
            .first()
            .map(|e| e.msg.clone())
            .unwrap_or_else(|| "Validation failed".to_string());
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
            errors,
        }
    }

    /// 500 with a generic body. The detail is logged, never returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Internal server error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.errors.is_empty() {
            (self.status, Json(MessageResponse { msg: self.message })).into_response()
        } else {
            (
                self.status,
                Json(ValidationErrors {
                    errors: self.errors,
                }),
            )
                .into_response()
        }
    }
}
