use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::nutrition::constants::{ActivityLevel, Gender, GoalType};
use crate::nutrition::metrics::ProfileInput;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRecord {
    pub id: i64,
    pub weight: f64,
    pub height: f64,
    pub age: i64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    pub goal_percentage: f64,
    pub last_updated: OffsetDateTime,
}

impl ProfileRecord {
    pub fn input(&self) -> ProfileInput {
        ProfileInput {
            weight: self.weight,
            height: self.height,
            age: self.age,
            gender: self.gender,
            activity_level: self.activity_level,
            goal_type: self.goal_type,
            goal_percentage: self.goal_percentage,
        }
    }
}

const COLUMNS: &str =
    "id, weight, height, age, gender, activity_level, goal_type, goal_percentage, last_updated";

/// There is exactly one profile: saving replaces whatever was stored before,
/// in a single transaction.
pub async fn save(db: &SqlitePool, input: &ProfileInput) -> sqlx::Result<ProfileRecord> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM profile").execute(&mut *tx).await?;
    let record = sqlx::query_as::<_, ProfileRecord>(&format!(
        r#"
        INSERT INTO profile (
            weight, height, age, gender, activity_level,
            goal_type, goal_percentage, last_updated
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(input.weight)
    .bind(input.height)
    .bind(input.age)
    .bind(input.gender)
    .bind(input.activity_level)
    .bind(input.goal_type)
    .bind(input.goal_percentage)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(record)
}

pub async fn load(db: &SqlitePool) -> sqlx::Result<Option<ProfileRecord>> {
    sqlx::query_as::<_, ProfileRecord>(&format!(
        "SELECT {COLUMNS} FROM profile ORDER BY last_updated DESC LIMIT 1"
    ))
    .fetch_optional(db)
    .await
}
