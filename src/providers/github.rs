// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub REST integration for listing a developer's recent repositories.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "devconnector-server";
const REPOS_PER_PAGE: u32 = 5;
const REPOS_SORT: &str = "created:asc";

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("GitHub username is empty")]
    EmptyUsername,

    #[error("GitHub client setup failed: {0}")]
    Setup(String),

    #[error("GitHub request failed: {0}")]
    Request(String),

    #[error("GitHub returned {0}")]
    Status(reqwest::StatusCode),

    #[error("GitHub response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    api_base_url: String,
    token: Option<String>,
    http: Client,
}

impl GithubClient {
    pub fn new(api_base_url: &str, token: Option<String>) -> Result<Self, GithubError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GithubError::Setup(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            http,
        })
    }

    /// URL of the repository listing for `username`.
    pub fn repos_url(&self, username: &str) -> Result<String, GithubError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GithubError::EmptyUsername);
        }
        let encoded: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
        Ok(format!(
            "{}/users/{}/repos?per_page={}&sort={}",
            self.api_base_url, encoded, REPOS_PER_PAGE, REPOS_SORT
        ))
    }

    /// Fetch the user's repositories, passing GitHub's JSON through as-is.
    pub async fn list_repos(&self, username: &str) -> Result<Value, GithubError> {
        let url = self.repos_url(username)?;
        debug!(%url, "Fetching GitHub repositories");

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GithubError::Request(format!("GET {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GithubError::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| GithubError::InvalidResponse(format!("GET {url} invalid JSON: {e}")))
    }
}
