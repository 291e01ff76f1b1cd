// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{auth::TokenService, providers::GithubClient, storage::Database};

/// Shared handles for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenService>,
    pub github: Arc<GithubClient>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenService, github: GithubClient) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            github: Arc::new(github),
        }
    }
}
