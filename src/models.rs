// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Request types carry a
//! `validate` method that collects every failed rule into a single
//! [`ApiError::validation`] so clients see all problems at once.
//!
//! String fields default to empty when absent, so a missing field is reported
//! by validation rather than rejected by the JSON extractor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, FieldError},
    storage::{
        Education, Experience, ExperiencePatch, Profile, ProfileFields, Social, StoredUser,
    },
};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Helpers
// =============================================================================

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Gravatar URL for a normalized email.
pub fn gravatar_url(normalized_email: &str) -> String {
    let digest = Sha256::digest(normalized_email.as_bytes());
    format!("https://www.gravatar.com/avatar/{digest:x}?s=200&r=pg&d=mm")
}

/// Split a comma-separated skills list, dropping blanks.
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(errors: &mut Vec<FieldError>, param: &str, value: &str, msg: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(param, msg));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}

// =============================================================================
// Users & Auth
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name, "Name cannot be empty");
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password cannot be less than 6 characters",
            ));
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        finish(errors)
    }
}

/// Issued session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// Owner details embedded in profile listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl From<&StoredUser> for UserSummary {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

// =============================================================================
// Profiles
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub status: String,
    pub githubusername: Option<String>,
    /// Comma-separated, e.g. `"rust, go, sql"`
    #[serde(default)]
    pub skills: String,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        require(&mut errors, "status", &self.status, "Status is required");
        if split_skills(&self.skills).is_empty() {
            errors.push(FieldError::new("skills", "Skills is required"));
        }
        finish(errors)
    }

    /// Validated fields; blank optional values count as not provided.
    pub fn into_fields(self) -> ProfileFields {
        ProfileFields {
            company: non_empty(self.company),
            website: non_empty(self.website),
            location: non_empty(self.location),
            bio: non_empty(self.bio),
            status: self.status.trim().to_string(),
            githubusername: non_empty(self.githubusername),
            skills: split_skills(&self.skills),
            social: Social {
                youtube: non_empty(self.youtube),
                twitter: non_empty(self.twitter),
                facebook: non_empty(self.facebook),
                linkedin: non_empty(self.linkedin),
                instagram: non_empty(self.instagram),
            },
        }
    }
}

/// Profile with its owner's public details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProfileResponse {
    pub id: String,
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: Social,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn new(profile: Profile, owner: UserSummary) -> Self {
        Self {
            id: profile.id,
            user: owner,
            company: profile.company,
            website: profile.website,
            location: profile.location,
            bio: profile.bio,
            status: profile.status,
            githubusername: profile.githubusername,
            skills: profile.skills,
            social: profile.social,
            experience: profile.experience,
            education: profile.education,
            date: profile.date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddExperienceRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    /// `YYYY-MM-DD`
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl AddExperienceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title, "Title is required");
        require(&mut errors, "company", &self.company, "Company is required");
        if self.from.is_none() {
            errors.push(FieldError::new("from", "From date is required"));
        }
        finish(errors)
    }

    /// Build the entry with a fresh id. Call after `validate`.
    pub fn into_experience(self) -> Result<Experience, ApiError> {
        let from = self
            .from
            .ok_or_else(|| ApiError::validation(vec![FieldError::new("from", "From date is required")]))?;
        Ok(Experience {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: non_empty(self.location),
            from,
            to: self.to,
            current: self.current,
            description: non_empty(self.description),
        })
    }
}

/// Merge-patch for an experience entry: omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl From<UpdateExperienceRequest> for ExperiencePatch {
    fn from(request: UpdateExperienceRequest) -> Self {
        Self {
            title: non_empty(request.title),
            company: non_empty(request.company),
            location: non_empty(request.location),
            from: request.from,
            to: request.to,
            current: request.current,
            description: non_empty(request.description),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddEducationRequest {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub fieldofstudy: String,
    /// `YYYY-MM-DD`
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl AddEducationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        require(&mut errors, "school", &self.school, "School is required");
        require(&mut errors, "degree", &self.degree, "Degree is required");
        require(
            &mut errors,
            "fieldofstudy",
            &self.fieldofstudy,
            "Field of study is required",
        );
        if self.from.is_none() {
            errors.push(FieldError::new("from", "From date is required"));
        }
        finish(errors)
    }

    /// Build the entry with a fresh id. Call after `validate`.
    pub fn into_education(self) -> Result<Education, ApiError> {
        let from = self
            .from
            .ok_or_else(|| ApiError::validation(vec![FieldError::new("from", "From date is required")]))?;
        Ok(Education {
            id: uuid::Uuid::new_v4().to_string(),
            school: self.school.trim().to_string(),
            degree: self.degree.trim().to_string(),
            fieldofstudy: self.fieldofstudy.trim().to_string(),
            from,
            to: self.to,
            current: self.current,
            description: non_empty(self.description),
        })
    }
}

// =============================================================================
// Posts
// =============================================================================

/// Body of a post or comment.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

impl TextRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        require(&mut errors, "text", &self.text, "Text is mandatory");
        finish(errors)
    }
}
