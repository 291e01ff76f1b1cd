// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Developer profiles, their experience and education entries, and the
//! GitHub repository lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{
    audit::AuditEventType,
    audit_event,
    auth::Auth,
    error::{ApiError, MessageResponse, ValidationErrors},
    models::{
        AddEducationRequest, AddExperienceRequest, ProfileRequest, ProfileResponse,
        UpdateExperienceRequest, UserSummary,
    },
    state::AppState,
    storage::{Database, DbResult, Profile, ProfileError, ProfileRepository, UserRepository},
};

const NO_PROFILE_FOR_USER: &str = "Profile does not exist for this user";

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::ProfileNotFound => ApiError::bad_request(NO_PROFILE_FOR_USER),
            ProfileError::ExperienceNotFound(_) => ApiError::not_found("Experience not found"),
            ProfileError::EducationNotFound(_) => ApiError::not_found("Education not found"),
            ProfileError::Db(e) => e.into(),
        }
    }
}

/// Attach the owner's public details. An owner that no longer exists shows
/// up with blank name and avatar.
fn with_owner(db: &Database, profile: Profile) -> DbResult<ProfileResponse> {
    let owner = match UserRepository::new(db).get(&profile.user)? {
        Some(user) => UserSummary::from(&user),
        None => UserSummary {
            id: profile.user.clone(),
            name: String::new(),
            avatar: String::new(),
        },
    };
    Ok(ProfileResponse::new(profile, owner))
}

#[utoipa::path(
    get,
    path = "/api/profile/me",
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, description = "No profile yet", body = MessageResponse)
    )
)]
pub async fn my_profile(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileRepository::new(&state.db)
        .get_by_user(&identity.user_id)?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE_FOR_USER))?;
    Ok(Json(with_owner(&state.db, profile)?))
}

/// Create the caller's profile, or merge the provided fields into it.
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = ProfileRequest,
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, description = "Validation failed", body = ValidationErrors)
    )
)]
pub async fn upsert_profile(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    request.validate()?;
    let profile =
        ProfileRepository::new(&state.db).upsert(&identity.user_id, request.into_fields())?;
    Ok(Json(with_owner(&state.db, profile)?))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    responses((status = 200, body = [ProfileResponse]))
)]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let profiles = ProfileRepository::new(&state.db).list_all()?;
    let populated = profiles
        .into_iter()
        .map(|profile| with_owner(&state.db, profile))
        .collect::<DbResult<Vec<_>>>()?;
    Ok(Json(populated))
}

#[utoipa::path(
    get,
    path = "/api/profile/user/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the profile")),
    tag = "Profile",
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, description = "No profile for this user", body = MessageResponse)
    )
)]
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileRepository::new(&state.db)
        .get_by_user(&user_id)?
        .ok_or_else(|| ApiError::bad_request("No Profile found"))?;
    Ok(Json(with_owner(&state.db, profile)?))
}

/// Delete the caller's posts, profile and account.
#[utoipa::path(
    delete,
    path = "/api/profile",
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses((status = 200, body = MessageResponse))
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    let removal = UserRepository::new(&state.db).delete_account(&identity.user_id)?;

    tracing::info!(
        user_id = %identity.user_id,
        posts = removal.posts,
        profile = removal.profile,
        "Account deleted"
    );
    audit_event!(AuditEventType::AccountDeleted, user = &identity.user_id);
    Ok(Json(MessageResponse::new("User succesfully deleted")))
}

#[utoipa::path(
    put,
    path = "/api/profile/experience",
    request_body = AddExperienceRequest,
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, description = "Validation failed or no profile", body = ValidationErrors)
    )
)]
pub async fn add_experience(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<AddExperienceRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    request.validate()?;
    let experience = request.into_experience()?;
    let profile = ProfileRepository::new(&state.db).add_experience(&identity.user_id, experience)?;
    Ok(Json(with_owner(&state.db, profile)?))
}

/// Merge-patch one experience entry; omitted fields keep their value.
#[utoipa::path(
    put,
    path = "/api/profile/experience/update/{exp_id}",
    params(("exp_id" = String, Path, description = "Experience entry to update")),
    request_body = UpdateExperienceRequest,
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 404, description = "Unknown experience entry", body = MessageResponse)
    )
)]
pub async fn update_experience(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(exp_id): Path<String>,
    Json(request): Json<UpdateExperienceRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileRepository::new(&state.db).update_experience(
        &identity.user_id,
        &exp_id,
        request.into(),
    )?;
    Ok(Json(with_owner(&state.db, profile)?))
}

#[utoipa::path(
    delete,
    path = "/api/profile/experience/{exp_id}",
    params(("exp_id" = String, Path, description = "Experience entry to remove")),
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 404, description = "Unknown experience entry", body = MessageResponse)
    )
)]
pub async fn delete_experience(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(exp_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileRepository::new(&state.db).remove_experience(&identity.user_id, &exp_id)?;
    Ok(Json(with_owner(&state.db, profile)?))
}

#[utoipa::path(
    put,
    path = "/api/profile/education",
    request_body = AddEducationRequest,
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, description = "Validation failed or no profile", body = ValidationErrors)
    )
)]
pub async fn add_education(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<AddEducationRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    request.validate()?;
    let education = request.into_education()?;
    let profile = ProfileRepository::new(&state.db).add_education(&identity.user_id, education)?;
    Ok(Json(with_owner(&state.db, profile)?))
}

#[utoipa::path(
    delete,
    path = "/api/profile/education/{edu_id}",
    params(("edu_id" = String, Path, description = "Education entry to remove")),
    tag = "Profile",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 404, description = "Unknown education entry", body = MessageResponse)
    )
)]
pub async fn delete_education(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(edu_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileRepository::new(&state.db).remove_education(&identity.user_id, &edu_id)?;
    Ok(Json(with_owner(&state.db, profile)?))
}

/// Latest repositories of a GitHub user, passed through from the GitHub API.
#[utoipa::path(
    get,
    path = "/api/profile/github/{username}",
    params(("username" = String, Path, description = "GitHub username")),
    tag = "Profile",
    responses(
        (status = 200, description = "Repositories as returned by GitHub"),
        (status = 404, description = "Lookup failed", body = MessageResponse)
    )
)]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.github.list_repos(&username).await {
        Ok(repos) => Ok(Json(repos)),
        Err(e) => {
            tracing::warn!(error = %e, %username, "GitHub lookup failed");
            Err(ApiError::not_found("No Github profile found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::VerifiedIdentity,
        state::test_support::test_state,
        storage::repository::users::tests::sample_user,
    };
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn auth(user_id: &str) -> Auth {
        Auth(VerifiedIdentity {
            user_id: user_id.to_string(),
        })
    }

    fn profile_request(status: &str, skills: &str) -> ProfileRequest {
        ProfileRequest {
            status: status.into(),
            skills: skills.into(),
            ..Default::default()
        }
    }

    fn seeded_state() -> (AppState, tempfile::TempDir) {
        let (state, dir) = test_state();
        UserRepository::new(&state.db)
            .create(&sample_user("u1", "u1@example.com"))
            .unwrap();
        (state, dir)
    }

    #[tokio::test]
    async fn my_profile_before_creation_is_bad_request() {
        let (state, _dir) = seeded_state();
        let err = my_profile(State(state), auth("u1")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, NO_PROFILE_FOR_USER);
    }

    #[tokio::test]
    async fn upsert_creates_then_merges() {
        let (state, _dir) = seeded_state();
        let mut first = profile_request("Developer", "rust, go");
        first.company = Some("Acme".into());
        let Json(created) = upsert_profile(State(state.clone()), auth("u1"), Json(first))
            .await
            .unwrap();
        assert_eq!(created.user.name, "User u1");
        assert_eq!(created.skills, vec!["rust", "go"]);

        let Json(updated) = upsert_profile(
            State(state.clone()),
            auth("u1"),
            Json(profile_request("Senior Developer", "rust")),
        )
        .await
        .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, "Senior Developer");
        assert_eq!(updated.company.as_deref(), Some("Acme"));

        let Json(all) = list_profiles(State(state)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn experience_lifecycle() {
        let (state, _dir) = seeded_state();
        upsert_profile(
            State(state.clone()),
            auth("u1"),
            Json(profile_request("Developer", "rust")),
        )
        .await
        .unwrap();

        let request = AddExperienceRequest {
            title: "Engineer".into(),
            company: "Acme".into(),
            from: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Default::default()
        };
        let Json(profile) = add_experience(State(state.clone()), auth("u1"), Json(request))
            .await
            .unwrap();
        let exp_id = profile.experience[0].id.clone();

        let patch = UpdateExperienceRequest {
            title: Some("Staff Engineer".into()),
            ..Default::default()
        };
        let Json(profile) = update_experience(
            State(state.clone()),
            auth("u1"),
            Path(exp_id.clone()),
            Json(patch),
        )
        .await
        .unwrap();
        assert_eq!(profile.experience[0].title, "Staff Engineer");
        assert_eq!(profile.experience[0].company, "Acme");

        let err = delete_experience(State(state.clone()), auth("u1"), Path("nope".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Experience not found");

        let Json(profile) = delete_experience(State(state), auth("u1"), Path(exp_id))
            .await
            .unwrap();
        assert!(profile.experience.is_empty());
    }

    #[tokio::test]
    async fn education_without_profile_is_bad_request() {
        let (state, _dir) = seeded_state();
        let request = AddEducationRequest {
            school: "MIT".into(),
            degree: "BSc".into(),
            fieldofstudy: "CS".into(),
            from: NaiveDate::from_ymd_opt(2010, 9, 1),
            ..Default::default()
        };
        let err = add_education(State(state), auth("u1"), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, NO_PROFILE_FOR_USER);
    }

    #[tokio::test]
    async fn unknown_user_profile_is_bad_request() {
        let (state, _dir) = seeded_state();
        let err = profile_by_user(State(state), Path("nobody".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "No Profile found");
    }

    #[tokio::test]
    async fn github_failure_is_not_found() {
        let (state, _dir) = test_state();
        let err = github_repos(State(state), Path("octocat".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "No Github profile found");
    }
}
