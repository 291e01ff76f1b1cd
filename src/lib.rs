// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DevConnector - Developer Social Network API
//!
//! REST backend for developer profiles, posts, comments and likes. Sessions
//! are stateless HS256 tokens sent in the `x-auth-token` header.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token service, auth gate and password hashing
//! - `providers` - External clients (GitHub)
//! - `storage` - Embedded document store (redb)

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod storage;
pub mod telemetry;
