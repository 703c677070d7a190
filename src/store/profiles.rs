//! Queries against the `profiles` table.
//!
//! Experience and education lists are JSONB sub-documents; mutations load the
//! whole document, update the list in memory and write it back.

use super::Store;
use crate::store::models::{
    Education, Experience, Profile, ProfileOwner, ProfileUpdate, SocialLinks,
};
use sqlx::{types::Json, Row};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "p.id, p.user_id, u.name, u.avatar, p.company, p.website, \
     p.location, p.status, p.skills, p.bio, p.social, p.experience, p.education, p.created_at";

fn map_profile(row: &sqlx::postgres::PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        user: ProfileOwner {
            id: row.get("user_id"),
            name: row.get("name"),
            avatar: row.get("avatar"),
        },
        company: row.get("company"),
        website: row.get("website"),
        location: row.get("location"),
        status: row.get("status"),
        skills: row.get::<Json<Vec<String>>, _>("skills").0,
        bio: row.get("bio"),
        social: row.get::<Json<SocialLinks>, _>("social").0,
        experience: row.get::<Json<Vec<Experience>>, _>("experience").0,
        education: row.get::<Json<Vec<Education>>, _>("education").0,
        date: row.get("created_at"),
    }
}

impl Store {
    pub async fn profile_by_owner(&self, owner: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS}
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.user_id = $1"
        );
        let row = sqlx::query(&query)
            .bind(owner)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.as_ref().map(map_profile))
    }

    pub async fn all_profiles(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS}
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query(&query).fetch_all(self.pool()).await?;

        Ok(rows.iter().map(map_profile).collect())
    }

    /// Update the profile owned by `owner` if one exists, else create it.
    ///
    /// Optional scalars only overwrite when supplied; `status`, `skills` and
    /// `social` are always written. This lookup-then-write is the only
    /// enforcement of "at most one profile per user".
    pub async fn upsert_profile(
        &self,
        owner: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, sqlx::Error> {
        let existing = sqlx::query("SELECT id FROM profiles WHERE user_id = $1")
            .bind(owner)
            .fetch_optional(self.pool())
            .await?;

        if existing.is_some() {
            sqlx::query(
                "UPDATE profiles
                 SET company = COALESCE($1, company),
                     website = COALESCE($2, website),
                     location = COALESCE($3, location),
                     status = $4,
                     skills = $5,
                     bio = COALESCE($6, bio),
                     social = $7
                 WHERE user_id = $8",
            )
            .bind(&update.company)
            .bind(&update.website)
            .bind(&update.location)
            .bind(&update.status)
            .bind(Json(&update.skills))
            .bind(&update.bio)
            .bind(Json(&update.social))
            .bind(owner)
            .execute(self.pool())
            .await?;
        } else {
            sqlx::query(
                "INSERT INTO profiles (user_id, company, website, location, status, skills, bio, social)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(owner)
            .bind(&update.company)
            .bind(&update.website)
            .bind(&update.location)
            .bind(&update.status)
            .bind(Json(&update.skills))
            .bind(&update.bio)
            .bind(Json(&update.social))
            .execute(self.pool())
            .await?;
        }

        self.profile_by_owner(owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn add_experience(
        &self,
        owner: Uuid,
        entry: Experience,
    ) -> Result<Profile, sqlx::Error> {
        let mut profile = self
            .profile_by_owner(owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        profile.add_experience(entry);
        self.save_entries(&profile).await?;

        Ok(profile)
    }

    pub async fn remove_experience(&self, owner: Uuid, id: Uuid) -> Result<Profile, sqlx::Error> {
        let mut profile = self
            .profile_by_owner(owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        profile.remove_experience(id);
        self.save_entries(&profile).await?;

        Ok(profile)
    }

    pub async fn add_education(
        &self,
        owner: Uuid,
        entry: Education,
    ) -> Result<Profile, sqlx::Error> {
        let mut profile = self
            .profile_by_owner(owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        profile.add_education(entry);
        self.save_entries(&profile).await?;

        Ok(profile)
    }

    pub async fn remove_education(&self, owner: Uuid, id: Uuid) -> Result<Profile, sqlx::Error> {
        let mut profile = self
            .profile_by_owner(owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        profile.remove_education(id);
        self.save_entries(&profile).await?;

        Ok(profile)
    }

    /// Delete the profile and its owning user in one transaction, so a
    /// failed user delete cannot leave an orphaned account behind.
    pub async fn delete_profile_and_user(&self, owner: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn save_entries(&self, profile: &Profile) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE profiles SET experience = $1, education = $2 WHERE user_id = $3")
            .bind(Json(&profile.experience))
            .bind(Json(&profile.education))
            .bind(profile.user.id)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
