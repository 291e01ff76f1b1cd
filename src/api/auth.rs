// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and current-user lookup.

use axum::{extract::State, Json};

use crate::{
    audit::AuditEventType,
    audit_event,
    auth::{password::verify_password, Auth, Claim},
    error::{ApiError, FieldError, MessageResponse, ValidationErrors},
    models::{LoginRequest, TokenResponse},
    state::AppState,
    storage::{UserRepository, UserResponse},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Exchange email and password for a session token.
///
/// Unknown email and wrong password produce the same response.
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ValidationErrors)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let Some(user) = UserRepository::new(&state.db).find_by_email(&request.email)? else {
        audit_event!(AuditEventType::LoginFailure, reason = "unknown_email");
        return Err(invalid_credentials());
    };

    if !verify_password(&request.password, &user.password_hash).map_err(ApiError::internal)? {
        audit_event!(AuditEventType::LoginFailure, user = &user.id);
        return Err(invalid_credentials());
    }
    audit_event!(AuditEventType::LoginSuccess, user = &user.id);

    let token = state
        .tokens
        .issue(&Claim::new(user.id.as_str()))
        .map_err(ApiError::internal)?;
    Ok(Json(TokenResponse {
        token: token.into_string(),
    }))
}

/// Current user, without the password hash.
#[utoipa::path(
    get,
    path = "/api/auth",
    tag = "Auth",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Account no longer exists", body = MessageResponse)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepository::new(&state.db)
        .get(&identity.user_id)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user.into()))
}

fn invalid_credentials() -> ApiError {
    ApiError::validation(vec![FieldError::general(INVALID_CREDENTIALS)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::users::register, auth::VerifiedIdentity, models::RegisterRequest,
        state::test_support::test_state,
    };
    use axum::http::StatusCode;

    async fn registered(state: &AppState) -> String {
        let Json(response) = register(
            State(state.clone()),
            Json(RegisterRequest {
                name: "Grace".into(),
                email: "grace@example.com".into(),
                password: "cobol1959".into(),
            }),
        )
        .await
        .unwrap();
        state.tokens.verify(&response.token).unwrap().user_id
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_with_correct_password_issues_token() {
        let (state, _dir) = test_state();
        let user_id = registered(&state).await;

        let Json(response) = login(
            State(state.clone()),
            Json(login_request("GRACE@example.com", "cobol1959")),
        )
        .await
        .unwrap();
        assert_eq!(state.tokens.verify(&response.token).unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (state, _dir) = test_state();
        registered(&state).await;

        let wrong = login(
            State(state.clone()),
            Json(login_request("grace@example.com", "fortran")),
        )
        .await
        .unwrap_err();
        let unknown = login(
            State(state),
            Json(login_request("nobody@example.com", "cobol1959")),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong.errors, unknown.errors);
        assert_eq!(wrong.errors[0].msg, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn current_user_hides_password_hash() {
        let (state, _dir) = test_state();
        let user_id = registered(&state).await;

        let Json(user) = current_user(
            State(state),
            Auth(VerifiedIdentity {
                user_id: user_id.clone(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(user.id, user_id);
        assert!(serde_json::to_value(&user).unwrap().get("password_hash").is_none());
    }

    #[tokio::test]
    async fn current_user_for_deleted_account_is_not_found() {
        let (state, _dir) = test_state();
        let err = current_user(
            State(state),
            Auth(VerifiedIdentity {
                user_id: "gone".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User not found");
    }
}
