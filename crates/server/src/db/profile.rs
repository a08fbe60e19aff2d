use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::ts;
use crate::models::Profile;

const COLUMNS: &str = "id, name, role, headline, about, location, email, phone, socials, \
                       resume_url, hero_image, available, created_at, updated_at";

pub async fn get(pool: &SqlitePool) -> Result<Option<Profile>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM profile ORDER BY created_at LIMIT 1");
    sqlx::query_as::<_, Profile>(&query).fetch_optional(pool).await
}

/// Returns the stored profile, inserting the default document first when the
/// table is empty. Concurrent first reads still end up with a single row.
pub async fn get_or_create(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Profile, sqlx::Error> {
    let fresh = Profile::new_default(now);
    let created_at = ts(&fresh.created_at);

    let inserted = sqlx::query(
        "INSERT INTO profile (id, name, role, socials, available, created_at, updated_at) \
         SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?6 \
         WHERE NOT EXISTS (SELECT 1 FROM profile)",
    )
    .bind(&fresh.id)
    .bind(&fresh.name)
    .bind(&fresh.role)
    .bind(&fresh.socials)
    .bind(fresh.available)
    .bind(&created_at)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        tracing::info!(id = %fresh.id, "default profile created");
    }

    match get(pool).await? {
        Some(profile) => Ok(profile),
        None => Err(sqlx::Error::RowNotFound),
    }
}

pub async fn save(pool: &SqlitePool, profile: &Profile) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE profile SET name = ?, role = ?, headline = ?, about = ?, location = ?, \
         email = ?, phone = ?, socials = ?, resume_url = ?, hero_image = ?, available = ?, \
         updated_at = ? WHERE id = ?",
    )
    .bind(&profile.name)
    .bind(&profile.role)
    .bind(&profile.headline)
    .bind(&profile.about)
    .bind(&profile.location)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(&profile.socials)
    .bind(&profile.resume_url)
    .bind(&profile.hero_image)
    .bind(profile.available)
    .bind(ts(&profile.updated_at))
    .bind(&profile.id)
    .execute(pool)
    .await?;
    Ok(())
}
