// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document database.
//!
//! Each repository borrows the [`Database`](super::Database) and exposes the
//! operations for one entity type.

pub mod posts;
pub mod profiles;
pub mod users;

pub use posts::{Comment, Like, Post, PostError, PostRepository};
pub use profiles::{
    Education, Experience, ExperiencePatch, Profile, ProfileError, ProfileFields,
    ProfileRepository, Social,
};
pub use users::{
    normalize_email, AccountRemoval, CreateUserError, StoredUser, UserRepository, UserResponse,
};
