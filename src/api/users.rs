// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    audit::AuditEventType,
    audit_event,
    auth::{password::hash_password, Claim},
    error::{ApiError, FieldError, ValidationErrors},
    models::{gravatar_url, RegisterRequest, TokenResponse},
    state::AppState,
    storage::{normalize_email, CreateUserError, StoredUser, UserRepository},
};

/// Register a new account and return a session token.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation failed or email taken", body = ValidationErrors)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let repo = UserRepository::new(&state.db);
    if repo.find_by_email(&email)?.is_some() {
        return Err(user_exists());
    }

    let password_hash = hash_password(&request.password).map_err(ApiError::internal)?;
    let user = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        name: request.name.trim().to_string(),
        avatar: gravatar_url(&email),
        email,
        password_hash,
        date: Utc::now(),
    };

    match repo.create(&user) {
        Ok(()) => {}
        Err(CreateUserError::EmailTaken) => return Err(user_exists()),
        Err(CreateUserError::Db(e)) => return Err(e.into()),
    }
    audit_event!(AuditEventType::UserRegistered, user = &user.id);

    let token = state
        .tokens
        .issue(&Claim::new(user.id.as_str()))
        .map_err(ApiError::internal)?;
    Ok(Json(TokenResponse {
        token: token.into_string(),
    }))
}

fn user_exists() -> ApiError {
    ApiError::validation(vec![FieldError::general("User Already Exists")])
}
