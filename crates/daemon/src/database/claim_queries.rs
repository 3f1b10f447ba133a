use async_trait::async_trait;
use sqlx::Row;

use common::prelude::{ClaimError, ClaimStore, Codebook, SecretHash};

use crate::database::Database;

fn decode_value_map(
    path: &str,
    value_map: Option<String>,
) -> Result<Codebook, ClaimError<sqlx::Error>> {
    // a NULL valueMap is as unreadable as a corrupt one
    let value_map = value_map.unwrap_or_default();
    Codebook::deserialize(value_map.as_bytes())
        .map_err(|e| ClaimError::MalformedCodebook(path.to_string(), e))
}

#[async_trait]
impl ClaimStore for Database {
    type Error = sqlx::Error;

    async fn get(&self, path: &str) -> Result<Option<Codebook>, ClaimError<Self::Error>> {
        let row = sqlx::query(
            r#"
            SELECT valueMap
            FROM codes
            WHERE path = ?
            "#,
        )
        .bind(path)
        .fetch_optional(&**self)
        .await?;

        match row {
            Some(row) => {
                let value_map: Option<String> = row.try_get("valueMap")?;
                decode_value_map(path, value_map).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn secret_hash(&self, path: &str) -> Result<Option<SecretHash>, ClaimError<Self::Error>> {
        let row = sqlx::query(
            r#"
            SELECT password
            FROM codes
            WHERE path = ?
            "#,
        )
        .bind(path)
        .fetch_optional(&**self)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let password: Option<String> = row.try_get("password")?;
        Ok(password.and_then(SecretHash::from_stored))
    }

    async fn create(
        &self,
        path: &str,
        secret_hash: &SecretHash,
        codebook: &Codebook,
    ) -> Result<(), ClaimError<Self::Error>> {
        let value_map = codebook
            .serialize()
            .map_err(|e| ClaimError::MalformedCodebook(path.to_string(), e))?;

        // an unclaimed row is taken over; a claimed one is left alone
        let result = sqlx::query(
            r#"
            INSERT INTO codes (path, password, valueMap)
            VALUES (?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                password = excluded.password,
                valueMap = excluded.valueMap
            WHERE codes.password IS NULL OR codes.password = ''
            "#,
        )
        .bind(path)
        .bind(secret_hash.as_str())
        .bind(value_map)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ClaimError::AlreadyExists(path.to_string()));
        }
        Ok(())
    }

    async fn update(&self, path: &str, codebook: &Codebook) -> Result<(), ClaimError<Self::Error>> {
        let value_map = codebook
            .serialize()
            .map_err(|e| ClaimError::MalformedCodebook(path.to_string(), e))?;

        let result = sqlx::query(
            r#"
            UPDATE codes
            SET valueMap = ?
            WHERE path = ?
            "#,
        )
        .bind(value_map)
        .bind(path)
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ClaimError::NotFound(path.to_string()));
        }
        Ok(())
    }
}
