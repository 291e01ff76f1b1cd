// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_auth, AUTH_TOKEN_HEADER},
    error::{FieldError, MessageResponse, ValidationErrors},
    models::{
        AddEducationRequest, AddExperienceRequest, LoginRequest, ProfileRequest, ProfileResponse,
        RegisterRequest, TextRequest, TokenResponse, UpdateExperienceRequest, UserSummary,
    },
    state::AppState,
    storage::{Comment, Education, Experience, Like, Post, Social, UserResponse},
};

pub mod auth;
pub mod health;
pub mod posts;
pub mod profile;
pub mod users;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/users", post(users::register))
        .route("/api/auth", post(auth::login))
        .route("/api/profile", get(profile::list_profiles))
        .route("/api/profile/user/{user_id}", get(profile::profile_by_user))
        .route("/api/profile/github/{username}", get(profile::github_repos));

    let protected_routes = Router::new()
        .route("/api/auth", get(auth::current_user))
        .route("/api/profile/me", get(profile::my_profile))
        .route(
            "/api/profile",
            post(profile::upsert_profile).delete(profile::delete_account),
        )
        .route("/api/profile/experience", put(profile::add_experience))
        .route(
            "/api/profile/experience/update/{exp_id}",
            put(profile::update_experience),
        )
        .route(
            "/api/profile/experience/{exp_id}",
            delete(profile::delete_experience),
        )
        .route("/api/profile/education", put(profile::add_education))
        .route(
            "/api/profile/education/{edu_id}",
            delete(profile::delete_education),
        )
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/{id}",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route("/api/posts/like/{id}", put(posts::like_post))
        .route("/api/posts/unlike/{id}", put(posts::unlike_post))
        .route("/api/posts/comment/{id}", post(posts::add_comment))
        .route(
            "/api/posts/comment/{id}/{comment_id}",
            post(posts::update_comment).delete(posts::delete_comment),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let health_routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "x_auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(AUTH_TOKEN_HEADER))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        auth::login,
        auth::current_user,
        profile::my_profile,
        profile::upsert_profile,
        profile::list_profiles,
        profile::profile_by_user,
        profile::delete_account,
        profile::add_experience,
        profile::update_experience,
        profile::delete_experience,
        profile::add_education,
        profile::delete_education,
        profile::github_repos,
        posts::create_post,
        posts::list_posts,
        posts::get_post,
        posts::delete_post,
        posts::like_post,
        posts::unlike_post,
        posts::add_comment,
        posts::update_comment,
        posts::delete_comment,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            UserSummary,
            ProfileRequest,
            ProfileResponse,
            Social,
            Experience,
            Education,
            AddExperienceRequest,
            UpdateExperienceRequest,
            AddEducationRequest,
            TextRequest,
            Post,
            Like,
            Comment,
            MessageResponse,
            ValidationErrors,
            FieldError,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Account registration"),
        (name = "Auth", description = "Login and current user"),
        (name = "Profile", description = "Developer profiles"),
        (name = "Posts", description = "Posts, likes and comments"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
