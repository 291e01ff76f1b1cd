// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post repository.
//!
//! Likes and comments are embedded in the post document; every change to
//! them is a single read-modify-write transaction on that post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{Database, DbError, DbResult, POSTS};
use super::super::ownership::{OwnedResource, OwnershipEnforcer, PermissionDenied};
use crate::auth::VerifiedIdentity;

/// A like on a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Like {
    /// User who liked the post
    pub user: String,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    /// Author user ID
    pub user: String,
    pub text: String,
    /// Author name at the time of writing
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// A feed post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    /// Author user ID
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    /// Newest first
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Newest first
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

impl OwnedResource for Post {
    const RESOURCE: &'static str = "post";

    fn owner_user_id(&self) -> &str {
        &self.user
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

impl OwnedResource for Comment {
    const RESOURCE: &'static str = "comment";

    fn owner_user_id(&self) -> &str {
        &self.user
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

impl Post {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("post not found")]
    NotFound,

    #[error("post already liked by this user")]
    AlreadyLiked,

    #[error("post not liked by this user")]
    NotLiked,

    #[error("comment not found")]
    CommentNotFound,

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Repository for posts.
pub struct PostRepository<'a> {
    db: &'a Database,
}

impl<'a> PostRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create(&self, post: &Post) -> DbResult<()> {
        self.db.put(POSTS, &post.id, post)
    }

    pub fn get(&self, post_id: &str) -> DbResult<Option<Post>> {
        self.db.get(POSTS, post_id)
    }

    /// List all posts, newest first.
    pub fn list_newest_first(&self) -> DbResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.db.scan(POSTS)?;
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// Delete a post written by the caller.
    pub fn delete(&self, post_id: &str, identity: &VerifiedIdentity) -> Result<(), PostError> {
        let post = self.get(post_id)?.ok_or(PostError::NotFound)?;
        post.verify_ownership(identity)?;
        self.db.remove(POSTS, post_id)?;
        Ok(())
    }

    /// Like a post once per user. Returns the updated likes.
    pub fn like(&self, post_id: &str, user_id: &str) -> Result<Vec<Like>, PostError> {
        self.modify(post_id, |post| {
            if post.is_liked_by(user_id) {
                return Err(PostError::AlreadyLiked);
            }
            post.likes.insert(
                0,
                Like {
                    user: user_id.to_string(),
                },
            );
            Ok(post.likes.clone())
        })
    }

    /// Remove the user's like. Returns the updated likes.
    pub fn unlike(&self, post_id: &str, user_id: &str) -> Result<Vec<Like>, PostError> {
        self.modify(post_id, |post| {
            let index = post
                .likes
                .iter()
                .position(|like| like.user == user_id)
                .ok_or(PostError::NotLiked)?;
            post.likes.remove(index);
            Ok(post.likes.clone())
        })
    }

    /// Prepend a comment. Returns the updated comments.
    pub fn add_comment(&self, post_id: &str, comment: Comment) -> Result<Vec<Comment>, PostError> {
        self.modify(post_id, |post| {
            post.comments.insert(0, comment);
            Ok(post.comments.clone())
        })
    }

    /// Replace the text of the caller's comment. Returns the updated comments.
    pub fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        identity: &VerifiedIdentity,
        text: String,
    ) -> Result<Vec<Comment>, PostError> {
        self.modify(post_id, |post| {
            let comment = post
                .comments
                .iter_mut()
                .find(|comment| comment.id == comment_id)
                .ok_or(PostError::CommentNotFound)?;
            comment.verify_ownership(identity)?;
            comment.text = text;
            Ok(post.comments.clone())
        })
    }

    /// Remove the caller's comment. Returns the updated comments.
    pub fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        identity: &VerifiedIdentity,
    ) -> Result<Vec<Comment>, PostError> {
        self.modify(post_id, |post| {
            let index = post
                .comments
                .iter()
                .position(|comment| comment.id == comment_id)
                .ok_or(PostError::CommentNotFound)?;
            post.comments[index].verify_ownership(identity)?;
            post.comments.remove(index);
            Ok(post.comments.clone())
        })
    }

    fn modify<R, F>(&self, post_id: &str, f: F) -> Result<R, PostError>
    where
        F: FnOnce(&mut Post) -> Result<R, PostError>,
    {
        self.db
            .update(POSTS, post_id, f)?
            .ok_or(PostError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_db;
    use chrono::Duration;

    fn post(id: &str, author: &str, age_secs: i64) -> Post {
        Post {
            id: id.to_string(),
            user: author.to_string(),
            text: format!("post {id}"),
            name: format!("User {author}"),
            avatar: "avatar".to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now() - Duration::seconds(age_secs),
        }
    }

    fn comment(id: &str, author: &str) -> Comment {
        Comment {
            id: id.to_string(),
            user: author.to_string(),
            text: "nice".to_string(),
            name: format!("User {author}"),
            avatar: "avatar".to_string(),
            date: Utc::now(),
        }
    }

    fn identity(user_id: &str) -> VerifiedIdentity {
        VerifiedIdentity {
            user_id: user_id.to_string(),
        }
    }

    #[test]
    fn list_is_newest_first() {
        let (db, _dir) = temp_db();
        let repo = PostRepository::new(&db);
        repo.create(&post("old", "u1", 100)).unwrap();
        repo.create(&post("new", "u1", 1)).unwrap();
        repo.create(&post("mid", "u2", 50)).unwrap();

        let ids: Vec<_> = repo
            .list_newest_first()
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn only_author_can_delete() {
        let (db, _dir) = temp_db();
        let repo = PostRepository::new(&db);
        repo.create(&post("p1", "u1", 0)).unwrap();

        let result = repo.delete("p1", &identity("u2"));
        assert!(matches!(result, Err(PostError::PermissionDenied(_))));
        assert!(repo.get("p1").unwrap().is_some());

        repo.delete("p1", &identity("u1")).unwrap();
        assert!(repo.get("p1").unwrap().is_none());
        assert!(matches!(
            repo.delete("p1", &identity("u1")),
            Err(PostError::NotFound)
        ));
    }

    #[test]
    fn like_once_then_unlike() {
        let (db, _dir) = temp_db();
        let repo = PostRepository::new(&db);
        repo.create(&post("p1", "u1", 0)).unwrap();

        let likes = repo.like("p1", "u2").unwrap();
        assert_eq!(likes, vec![Like { user: "u2".into() }]);
        assert!(matches!(repo.like("p1", "u2"), Err(PostError::AlreadyLiked)));

        let likes = repo.unlike("p1", "u2").unwrap();
        assert!(likes.is_empty());
        assert!(matches!(repo.unlike("p1", "u2"), Err(PostError::NotLiked)));
    }

    #[test]
    fn like_on_missing_post_is_not_found() {
        let (db, _dir) = temp_db();
        let repo = PostRepository::new(&db);
        assert!(matches!(repo.like("nope", "u1"), Err(PostError::NotFound)));
    }

    #[test]
    fn comments_are_owned() {
        let (db, _dir) = temp_db();
        let repo = PostRepository::new(&db);
        repo.create(&post("p1", "u1", 0)).unwrap();
        repo.add_comment("p1", comment("c1", "u2")).unwrap();
        let comments = repo.add_comment("p1", comment("c2", "u3")).unwrap();
        assert_eq!(comments[0].id, "c2");

        let result = repo.update_comment("p1", "c1", &identity("u3"), "hijack".into());
        assert!(matches!(result, Err(PostError::PermissionDenied(_))));

        let comments = repo
            .update_comment("p1", "c1", &identity("u2"), "edited".into())
            .unwrap();
        assert_eq!(comments[1].text, "edited");

        let result = repo.delete_comment("p1", "c1", &identity("u1"));
        assert!(matches!(result, Err(PostError::PermissionDenied(_))));

        let comments = repo.delete_comment("p1", "c1", &identity("u2")).unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2"]);

        assert!(matches!(
            repo.delete_comment("p1", "c1", &identity("u2")),
            Err(PostError::CommentNotFound)
        ));
    }
}
