//! Profile endpoints: upsert, public reads, nested experience/education
//! entries, and the cascading delete.

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, FieldError};
use crate::store::{
    models::{Education, Experience, Profile, ProfileUpdate, SocialLinks},
    Store,
};
use axum::{
    extract::{Extension, Path},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// Comma-separated list, split and trimmed into an ordered list.
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExperienceRequest {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EducationRequest {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/profile/me",
    responses(
        (status = 200, description = "Profile with owner expanded", body = Profile),
        (status = 400, description = "No profile for this user"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "profile"
)]
pub async fn my_profile(
    user: AuthUser,
    Extension(store): Extension<Store>,
) -> Result<Json<Profile>, ApiError> {
    let profile = store
        .profile_by_owner(user.id)
        .await?
        .ok_or(ApiError::Client("There is no profile for this user"))?;

    Ok(Json(profile))
}

/// Create or update the authenticated user's profile (upsert-by-owner).
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Created or updated profile", body = Profile),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn upsert_profile(
    user: AuthUser,
    Extension(store): Extension<Store>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let update = build_update(&payload)?;
    let profile = store.upsert_profile(user.id, &update).await?;

    Ok(Json(profile))
}

/// List every profile with owner name/avatar expanded.
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "All profiles", body = [Profile]),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn all_profiles(
    Extension(store): Extension<Store>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = store.all_profiles().await?;

    Ok(Json(profiles))
}

/// Look up a profile by its owner's user id.
#[utoipa::path(
    get,
    path = "/api/profile/user/{user_id}",
    params(
        ("user_id" = String, Path, description = "Owning user id")
    ),
    responses(
        (status = 200, description = "Profile with owner expanded", body = Profile),
        (status = 400, description = "Malformed id or no matching profile"),
    ),
    tag = "profile"
)]
pub async fn profile_by_user(
    Path(user_id): Path<String>,
    Extension(store): Extension<Store>,
) -> Result<Json<Profile>, ApiError> {
    let owner = Uuid::parse_str(user_id.trim()).map_err(|_| ApiError::Client("Profile not Found"))?;

    let profile = store
        .profile_by_owner(owner)
        .await?
        .ok_or(ApiError::Client("Cannot Find Profile"))?;

    Ok(Json(profile))
}

/// Add an experience entry at the front of the list.
#[utoipa::path(
    put,
    path = "/api/profile/experience",
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn add_experience(
    user: AuthUser,
    Extension(store): Extension<Store>,
    Json(payload): Json<ExperienceRequest>,
) -> Result<Json<Profile>, ApiError> {
    let entry = Experience {
        id: Uuid::new_v4(),
        title: payload.title,
        company: payload.company,
        location: payload.location,
        from: payload.from,
        to: payload.to,
        current: payload.current,
        description: payload.description,
    };

    let profile = store.add_experience(user.id, entry).await?;

    Ok(Json(profile))
}

/// Remove an experience entry by its id. An unknown or malformed id is a
/// no-op that still returns the profile.
#[utoipa::path(
    delete,
    path = "/api/profile/experience/{exp_id}",
    params(
        ("exp_id" = String, Path, description = "Experience entry id")
    ),
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn remove_experience(
    user: AuthUser,
    Path(exp_id): Path<String>,
    Extension(store): Extension<Store>,
) -> Result<Json<Profile>, ApiError> {
    let profile = match Uuid::parse_str(exp_id.trim()) {
        Ok(id) => store.remove_experience(user.id, id).await?,
        Err(_) => store
            .profile_by_owner(user.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?,
    };

    Ok(Json(profile))
}

/// Add an education entry at the front of the list.
#[utoipa::path(
    put,
    path = "/api/profile/education",
    request_body = EducationRequest,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn add_education(
    user: AuthUser,
    Extension(store): Extension<Store>,
    Json(payload): Json<EducationRequest>,
) -> Result<Json<Profile>, ApiError> {
    let entry = Education {
        id: Uuid::new_v4(),
        school: payload.school,
        degree: payload.degree,
        fieldofstudy: payload.fieldofstudy,
        from: payload.from,
        to: payload.to,
        current: payload.current,
        description: payload.description,
    };

    let profile = store.add_education(user.id, entry).await?;

    Ok(Json(profile))
}

/// Remove an education entry by its own id, never by the experience
/// parameter.
#[utoipa::path(
    delete,
    path = "/api/profile/education/{edu_id}",
    params(
        ("edu_id" = String, Path, description = "Education entry id")
    ),
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn remove_education(
    user: AuthUser,
    Path(edu_id): Path<String>,
    Extension(store): Extension<Store>,
) -> Result<Json<Profile>, ApiError> {
    let profile = match Uuid::parse_str(edu_id.trim()) {
        Ok(id) => store.remove_education(user.id, id).await?,
        Err(_) => store
            .profile_by_owner(user.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?,
    };

    Ok(Json(profile))
}

/// Delete the authenticated user's profile and account.
#[utoipa::path(
    delete,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile and user deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "profile"
)]
pub async fn delete_profile(
    user: AuthUser,
    Extension(store): Extension<Store>,
) -> Result<Json<Value>, ApiError> {
    store.delete_profile_and_user(user.id).await?;

    Ok(Json(json!({ "msg": "profile and user deleted" })))
}

fn build_update(payload: &ProfileRequest) -> Result<ProfileUpdate, ApiError> {
    let mut errors = Vec::new();

    let status = normalize_optional(payload.status.clone());
    if status.is_none() {
        errors.push(FieldError::new("Status is required", "status"));
    }

    let skills = normalize_optional(payload.skills.clone());
    if skills.is_none() {
        errors.push(FieldError::new("Skills is required", "skills"));
    }

    let (Some(status), Some(skills)) = (status, skills) else {
        return Err(ApiError::Validation(errors));
    };

    Ok(ProfileUpdate {
        company: normalize_optional(payload.company.clone()),
        website: normalize_optional(payload.website.clone()),
        location: normalize_optional(payload.location.clone()),
        status,
        skills: parse_skills(&skills),
        bio: normalize_optional(payload.bio.clone()),
        social: SocialLinks {
            youtube: normalize_optional(payload.youtube.clone()),
            twitter: normalize_optional(payload.twitter.clone()),
            facebook: normalize_optional(payload.facebook.clone()),
            linkedin: normalize_optional(payload.linkedin.clone()),
            instagram: normalize_optional(payload.instagram.clone()),
        },
    })
}

/// Split on commas and trim each skill, preserving order.
fn parse_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skills_splits_and_trims() {
        assert_eq!(
            parse_skills("Rust, SQL ,  HTTP"),
            vec!["Rust".to_string(), "SQL".to_string(), "HTTP".to_string()]
        );
    }

    #[test]
    fn test_parse_skills_preserves_order() {
        assert_eq!(parse_skills("c,b,a"), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_parse_skills_drops_empty_segments() {
        assert_eq!(parse_skills("Rust,,SQL,"), vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_build_update_requires_status_and_skills() {
        let err = build_update(&ProfileRequest::default()).unwrap_err();

        let ApiError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        let params: Vec<_> = errors.iter().filter_map(|e| e.param).collect();
        assert_eq!(params, vec!["status", "skills"]);
    }

    #[test]
    fn test_build_update_is_sparse() {
        let payload = ProfileRequest {
            status: Some("Developer".to_string()),
            skills: Some("Rust".to_string()),
            company: Some("  ".to_string()),
            twitter: Some("https://twitter.com/a".to_string()),
            ..ProfileRequest::default()
        };

        let update = build_update(&payload).unwrap();

        assert_eq!(update.status, "Developer");
        assert_eq!(update.skills, vec!["Rust"]);
        // blank strings are treated as not supplied
        assert!(update.company.is_none());
        assert!(update.bio.is_none());
        assert_eq!(update.social.twitter.as_deref(), Some("https://twitter.com/a"));
        assert!(update.social.youtube.is_none());
    }

    #[test]
    fn test_build_update_trims_supplied_fields() {
        let payload = ProfileRequest {
            status: Some("  Developer  ".to_string()),
            skills: Some("Rust".to_string()),
            location: Some(" Lisbon ".to_string()),
            ..ProfileRequest::default()
        };

        let update = build_update(&payload).unwrap();

        assert_eq!(update.status, "Developer");
        assert_eq!(update.location.as_deref(), Some("Lisbon"));
    }
}
