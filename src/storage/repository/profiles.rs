// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Profile repository.
//!
//! Each user has at most one profile, stored under the owner's user id.
//! Experience and education entries are embedded in the profile document
//! and are kept newest first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{Database, DbError, DbResult, PROFILES};

/// Social network links on a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Social {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// A job entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An education entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Developer profile as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    /// Owner user ID
    pub user: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

/// Validated profile fields from a create-or-update request.
///
/// `None` means "not provided": on update the stored value is kept.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: Social,
}

/// Merge-patch for an experience entry.
#[derive(Debug, Clone, Default)]
pub struct ExperiencePatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

fn merge<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl Social {
    fn merge(&mut self, other: Social) {
        merge(&mut self.youtube, other.youtube);
        merge(&mut self.twitter, other.twitter);
        merge(&mut self.facebook, other.facebook);
        merge(&mut self.linkedin, other.linkedin);
        merge(&mut self.instagram, other.instagram);
    }
}

impl Profile {
    /// Build a new profile for `user_id`.
    pub fn create(user_id: &str, fields: ProfileFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user: user_id.to_string(),
            company: fields.company,
            website: fields.website,
            location: fields.location,
            bio: fields.bio,
            status: fields.status,
            githubusername: fields.githubusername,
            skills: fields.skills,
            social: fields.social,
            experience: Vec::new(),
            education: Vec::new(),
            date: Utc::now(),
        }
    }

    /// Apply provided fields; absent ones keep their stored value.
    pub fn apply(&mut self, fields: ProfileFields) {
        merge(&mut self.company, fields.company);
        merge(&mut self.website, fields.website);
        merge(&mut self.location, fields.location);
        merge(&mut self.bio, fields.bio);
        merge(&mut self.githubusername, fields.githubusername);
        self.status = fields.status;
        self.skills = fields.skills;
        self.social.merge(fields.social);
    }
}

impl Experience {
    fn patch(&mut self, patch: ExperiencePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(from) = patch.from {
            self.from = from;
        }
        if let Some(current) = patch.current {
            self.current = current;
        }
        merge(&mut self.location, patch.location);
        merge(&mut self.to, patch.to);
        merge(&mut self.description, patch.description);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile not found")]
    ProfileNotFound,

    #[error("experience {0} not found")]
    ExperienceNotFound(String),

    #[error("education {0} not found")]
    EducationNotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Repository for profile documents.
pub struct ProfileRepository<'a> {
    db: &'a Database,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the profile owned by a user.
    pub fn get_by_user(&self, user_id: &str) -> DbResult<Option<Profile>> {
        self.db.get(PROFILES, user_id)
    }

    /// List all profiles.
    pub fn list_all(&self) -> DbResult<Vec<Profile>> {
        self.db.scan(PROFILES)
    }

    /// Create the user's profile or merge `fields` into the existing one.
    pub fn upsert(&self, user_id: &str, fields: ProfileFields) -> DbResult<Profile> {
        self.db
            .upsert(PROFILES, user_id, |existing: Option<Profile>| match existing {
                Some(mut profile) => {
                    profile.apply(fields);
                    profile
                }
                None => Profile::create(user_id, fields),
            })
    }

    /// Prepend an experience entry.
    pub fn add_experience(&self, user_id: &str, experience: Experience) -> Result<Profile, ProfileError> {
        self.modify(user_id, |profile| {
            profile.experience.insert(0, experience);
            Ok(())
        })
    }

    /// Merge-patch one experience entry.
    pub fn update_experience(
        &self,
        user_id: &str,
        experience_id: &str,
        patch: ExperiencePatch,
    ) -> Result<Profile, ProfileError> {
        self.modify(user_id, |profile| {
            let entry = profile
                .experience
                .iter_mut()
                .find(|exp| exp.id == experience_id)
                .ok_or_else(|| ProfileError::ExperienceNotFound(experience_id.to_string()))?;
            entry.patch(patch);
            Ok(())
        })
    }

    /// Remove one experience entry.
    pub fn remove_experience(&self, user_id: &str, experience_id: &str) -> Result<Profile, ProfileError> {
        self.modify(user_id, |profile| {
            let index = profile
                .experience
                .iter()
                .position(|exp| exp.id == experience_id)
                .ok_or_else(|| ProfileError::ExperienceNotFound(experience_id.to_string()))?;
            profile.experience.remove(index);
            Ok(())
        })
    }

    /// Prepend an education entry.
    pub fn add_education(&self, user_id: &str, education: Education) -> Result<Profile, ProfileError> {
        self.modify(user_id, |profile| {
            profile.education.insert(0, education);
            Ok(())
        })
    }

    /// Remove one education entry.
    pub fn remove_education(&self, user_id: &str, education_id: &str) -> Result<Profile, ProfileError> {
        self.modify(user_id, |profile| {
            let index = profile
                .education
                .iter()
                .position(|edu| edu.id == education_id)
                .ok_or_else(|| ProfileError::EducationNotFound(education_id.to_string()))?;
            profile.education.remove(index);
            Ok(())
        })
    }

    fn modify<F>(&self, user_id: &str, f: F) -> Result<Profile, ProfileError>
    where
        F: FnOnce(&mut Profile) -> Result<(), ProfileError>,
    {
        self.db
            .update(
                PROFILES,
                user_id,
                |profile: &mut Profile| -> Result<Profile, ProfileError> {
                    f(profile)?;
                    Ok(profile.clone())
                },
            )?
            .ok_or(ProfileError::ProfileNotFound)
    }
}
