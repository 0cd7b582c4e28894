use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A persisted user record. At most one record exists per email; the prompt
/// history keeps insertion order and only shrinks through positional deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub prompts: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, prompts, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a record with an empty prompt history.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, prompts, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Create a record whose history already holds its first prompt.
    pub async fn create_with_prompt(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        prompt: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, prompts)
            VALUES ($1, $2, $3, ARRAY[$4])
            RETURNING id, username, email, password_hash, prompts, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(prompt)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Append a prompt to the record's history. Returns `None` when no record
    /// exists for the email.
    pub async fn append_prompt(
        db: &PgPool,
        email: &str,
        prompt: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET prompts = array_append(prompts, $2), updated_at = now()
            WHERE email = $1
            RETURNING id, username, email, password_hash, prompts, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(prompt)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Overwrite the record's prompt history wholesale. Positional deletion is
    /// a read-modify-write; concurrent writers on the same email can lose
    /// updates, which the service accepts.
    pub async fn replace_prompts(
        db: &PgPool,
        email: &str,
        prompts: &[String],
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET prompts = $2, updated_at = now()
            WHERE email = $1
            RETURNING id, username, email, password_hash, prompts, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(prompts)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            prompts: vec!["first".into(), "second".into()],
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$argon2id$secret"));
        assert!(json.contains("alice@example.com"));
    }

    #[test]
    fn prompt_order_survives_serialization() {
        let json = serde_json::to_value(sample_user()).unwrap();
        let prompts: Vec<String> =
            serde_json::from_value(json.get("prompts").unwrap().clone()).unwrap();
        assert_eq!(prompts, vec!["first".to_string(), "second".to_string()]);
    }
}
