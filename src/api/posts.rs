// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Feed posts, likes and comments. Every route here sits behind the gate.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    audit::AuditEventType,
    audit_event,
    auth::Auth,
    error::{ApiError, MessageResponse, ValidationErrors},
    models::TextRequest,
    state::AppState,
    storage::{
        Comment, Like, OwnedResource, Post, PostError, PostRepository, StoredUser, UserRepository,
    },
};

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound => ApiError::not_found("Post not found"),
            PostError::AlreadyLiked => ApiError::bad_request("Post cannot be liked twice"),
            PostError::NotLiked => ApiError::bad_request("Post cannot be unliked"),
            PostError::CommentNotFound => ApiError::not_found("Comment not found"),
            PostError::PermissionDenied(denied) => {
                audit_event!(
                    AuditEventType::PermissionDenied,
                    user = &denied.user_id,
                    resource = denied.resource,
                    &denied.resource_id
                );
                if denied.resource == Post::RESOURCE {
                    ApiError::unauthorized("User not authorized")
                } else {
                    ApiError::unauthorized("Access Denied")
                }
            }
            PostError::Db(e) => e.into(),
        }
    }
}

fn author(state: &AppState, user_id: &str) -> Result<StoredUser, ApiError> {
    UserRepository::new(&state.db)
        .get(user_id)?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = TextRequest,
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = Post),
        (status = 400, description = "Validation failed", body = ValidationErrors)
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<TextRequest>,
) -> Result<Json<Post>, ApiError> {
    request.validate()?;
    let user = author(&state, &identity.user_id)?;

    let post = Post {
        id: uuid::Uuid::new_v4().to_string(),
        user: user.id,
        text: request.text.trim().to_string(),
        name: user.name,
        avatar: user.avatar,
        likes: Vec::new(),
        comments: Vec::new(),
        date: Utc::now(),
    };
    PostRepository::new(&state.db).create(&post)?;
    Ok(Json(post))
}

/// All posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses((status = 200, body = [Post]))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Auth(_identity): Auth,
) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(PostRepository::new(&state.db).list_newest_first()?))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = Post),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Auth(_identity): Auth,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = PostRepository::new(&state.db)
        .get(&id)?
        .ok_or(PostError::NotFound)?;
    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Not the author", body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    PostRepository::new(&state.db).delete(&id, &identity)?;
    Ok(Json(MessageResponse::new("Post successfully deleted")))
}

#[utoipa::path(
    put,
    path = "/api/posts/like/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = [Like]),
        (status = 400, description = "Already liked", body = MessageResponse)
    )
)]
pub async fn like_post(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    Ok(Json(PostRepository::new(&state.db).like(&id, &identity.user_id)?))
}

#[utoipa::path(
    put,
    path = "/api/posts/unlike/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = [Like]),
        (status = 400, description = "Not liked yet", body = MessageResponse)
    )
)]
pub async fn unlike_post(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    Ok(Json(PostRepository::new(&state.db).unlike(&id, &identity.user_id)?))
}

#[utoipa::path(
    post,
    path = "/api/posts/comment/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = TextRequest,
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = [Comment]),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path(id): Path<String>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    request.validate()?;
    let user = author(&state, &identity.user_id)?;

    let comment = Comment {
        id: uuid::Uuid::new_v4().to_string(),
        user: user.id,
        text: request.text.trim().to_string(),
        name: user.name,
        avatar: user.avatar,
        date: Utc::now(),
    };
    Ok(Json(PostRepository::new(&state.db).add_comment(&id, comment)?))
}

#[utoipa::path(
    post,
    path = "/api/posts/comment/{id}/{comment_id}",
    params(
        ("id" = String, Path, description = "Post identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    request_body = TextRequest,
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = [Comment]),
        (status = 401, description = "Not the comment author", body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path((id, comment_id)): Path<(String, String)>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    request.validate()?;
    let comments = PostRepository::new(&state.db).update_comment(
        &id,
        &comment_id,
        &identity,
        request.text.trim().to_string(),
    )?;
    Ok(Json(comments))
}

#[utoipa::path(
    delete,
    path = "/api/posts/comment/{id}/{comment_id}",
    params(
        ("id" = String, Path, description = "Post identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    tag = "Posts",
    security(("x_auth_token" = [])),
    responses(
        (status = 200, body = [Comment]),
        (status = 401, description = "Not the comment author", body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = PostRepository::new(&state.db).delete_comment(&id, &comment_id, &identity)?;
    Ok(Json(comments))
}
