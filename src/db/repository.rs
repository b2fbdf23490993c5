//! Key/value repository over the SQLite pool.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// A cache row as stored; the payload is still serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub payload: String,
    pub timestamp: i64,
    pub version: String,
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_cache_record(&self, namespace: &str) -> Result<Option<StoredRecord>, AppError> {
        let row = sqlx::query(
            "SELECT payload, timestamp, version FROM cache_records WHERE namespace = ?",
        )
        .bind(namespace)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| StoredRecord {
            payload: r.get("payload"),
            timestamp: r.get("timestamp"),
            version: r.get("version"),
        }))
    }

    /// Insert or overwrite the record of a namespace.
    pub async fn put_cache_record(
        &self,
        namespace: &str,
        record: &StoredRecord,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO cache_records (namespace, payload, timestamp, version)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(namespace) DO UPDATE SET
                   payload = excluded.payload,
                   timestamp = excluded.timestamp,
                   version = excluded.version"#,
        )
        .bind(namespace)
        .bind(&record.payload)
        .bind(record.timestamp)
        .bind(&record.version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_cache_record(&self, namespace: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cache_records WHERE namespace = ?")
            .bind(namespace)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_preferences(&self) -> Result<HashMap<String, String>, AppError> {
        let rows = sqlx::query("SELECT key, value FROM preferences")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get("key"), r.get("value")))
            .collect())
    }

    /// Write several preference keys in one transaction.
    pub async fn set_preferences(&self, values: &[(&str, String)]) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in values {
            sqlx::query(
                r#"INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
                   ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
            )
            .bind(*key)
            .bind(value.as_str())
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_preferences(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("DELETE FROM preferences WHERE key = ?")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
