use sqlx::PgPool;
use uuid::Uuid;

use super::dto::ProfilePatch;
use super::repo_types::UserProfile;

const PROFILE_COLUMNS: &str = "user_id, first_name, last_name, email, diabetes_type, gender, \
    age, weight_kg, height_cm, phone, address, photo_url, updated_at";

pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Creates the profile on first write; afterwards only supplied fields change.
pub async fn merge(db: &PgPool, user_id: Uuid, p: &ProfilePatch) -> anyhow::Result<UserProfile> {
    let row = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        INSERT INTO user_profiles
            (user_id, first_name, last_name, email, diabetes_type, gender,
             age, weight_kg, height_cm, phone, address, photo_url)
        VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, ''),
                COALESCE($6, ''), $7, $8, $9, $10, $11, $12)
        ON CONFLICT (user_id) DO UPDATE SET
            first_name    = COALESCE($2, user_profiles.first_name),
            last_name     = COALESCE($3, user_profiles.last_name),
            email         = COALESCE($4, user_profiles.email),
            diabetes_type = COALESCE($5, user_profiles.diabetes_type),
            gender        = COALESCE($6, user_profiles.gender),
            age           = COALESCE($7, user_profiles.age),
            weight_kg     = COALESCE($8, user_profiles.weight_kg),
            height_cm     = COALESCE($9, user_profiles.height_cm),
            phone         = COALESCE($10, user_profiles.phone),
            address       = COALESCE($11, user_profiles.address),
            photo_url     = COALESCE($12, user_profiles.photo_url),
            updated_at    = now()
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&p.first_name)
    .bind(&p.last_name)
    .bind(&p.email)
    .bind(&p.diabetes_type)
    .bind(&p.gender)
    .bind(p.age)
    .bind(p.weight_kg)
    .bind(p.height_cm)
    .bind(&p.phone)
    .bind(&p.address)
    .bind(&p.photo_url)
    .fetch_one(db)
    .await?;
    Ok(row)
}
