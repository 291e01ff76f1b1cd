// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users, profiles and posts in a single embedded
//! redb file (`DATABASE_PATH`).
//!
//! ## Storage Layout
//!
//! ```text
//! users           user_id -> StoredUser (JSON)
//! users_by_email  email   -> user_id
//! profiles        user_id -> Profile (JSON)
//! posts           post_id -> Post (JSON, likes and comments embedded)
//! ```
//!
//! Password hashes live only in `users` and never leave this layer through
//! the public response types.

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{Database, DbError, DbResult};
pub use ownership::{OwnedResource, OwnershipEnforcer, PermissionDenied};
pub use repository::{
    normalize_email, AccountRemoval, Comment, CreateUserError, Education, Experience,
    ExperiencePatch, Like, Post, PostError, PostRepository, Profile, ProfileError, ProfileFields,
    ProfileRepository, Social, StoredUser, UserRepository, UserResponse,
};
