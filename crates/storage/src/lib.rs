use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info};

use shared::{
    domain::{Complaint, ComplaintId, Gender},
    error::{StorageError, StorageErrorKind},
    store::ComplaintStore,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    /// Opens (creating if needed) the database behind `database_url` and
    /// ensures the complaints table exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(|error| sqlx_error("parse database url", error))?
            .create_if_missing(true);
        // Single connection that never expires; an in-memory database lives
        // only as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|error| sqlx_error("open database", error))?;

        let storage = Self { pool };
        storage.initialize().await?;
        info!(%database_url, "opened complaint database");
        Ok(storage)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Creates the complaints table when missing. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(migrate_error)
    }

    pub async fn health_check(&self) -> Result<(), StorageError> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| sqlx_error("sqlite ping", error))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn add_complaint(
        &self,
        name: &str,
        gender: Gender,
        comment: &str,
    ) -> Result<ComplaintId, StorageError> {
        let rec = sqlx::query(
            "INSERT INTO complaints (name, gender, comment) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(gender.as_str())
        .bind(comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| sqlx_error("insert complaint", error))?;
        let id = ComplaintId(
            rec.try_get::<i64, _>(0)
                .map_err(|error| sqlx_error("read inserted id", error))?,
        );
        debug!(complaint_id = id.0, "complaint added");
        Ok(id)
    }

    pub async fn list_complaints(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<Complaint>, StorageError> {
        let rows = match search.filter(|s| !s.is_empty()) {
            Some(search) => {
                sqlx::query(
                    r"SELECT id, name, gender, comment, submitted
                      FROM complaints
                      WHERE name LIKE ?1 ESCAPE '\' OR comment LIKE ?1 ESCAPE '\'
                      ORDER BY id ASC",
                )
                .bind(like_pattern(search))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, name, gender, comment, submitted
                     FROM complaints
                     ORDER BY id ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|error| sqlx_error("list complaints", error))?;

        rows.iter().map(complaint_from_row).collect()
    }

    pub async fn delete_complaint(&self, id: ComplaintId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|error| sqlx_error("delete complaint", error))?;
        debug!(
            complaint_id = id.0,
            removed = result.rows_affected(),
            "complaint delete finished"
        );
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| sqlx_error("count complaints", error))
    }
}

fn complaint_from_row(row: &SqliteRow) -> Result<Complaint, StorageError> {
    let id = ComplaintId(
        row.try_get::<i64, _>("id")
            .map_err(|error| sqlx_error("decode id", error))?,
    );
    let gender_text: String = row
        .try_get("gender")
        .map_err(|error| sqlx_error("decode gender", error))?;
    let gender = gender_text.parse::<Gender>().map_err(|error| {
        StorageError::new(StorageErrorKind::Decode, format!("complaint {id}: {error}"))
    })?;
    let submitted = row
        .try_get::<Option<DateTime<Utc>>, _>("submitted")
        .map_err(|error| sqlx_error("decode submitted", error))?
        .ok_or_else(|| {
            StorageError::new(
                StorageErrorKind::Decode,
                format!("complaint {id}: missing submitted timestamp"),
            )
        })?;

    Ok(Complaint {
        id,
        name: row
            .try_get("name")
            .map_err(|error| sqlx_error("decode name", error))?,
        gender,
        comment: row
            .try_get("comment")
            .map_err(|error| sqlx_error("decode comment", error))?,
        submitted,
    })
}

/// `%search%` with LIKE wildcards in `search` matched literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn sqlx_error(operation: &str, error: sqlx::Error) -> StorageError {
    let kind = match &error {
        sqlx::Error::Database(_) | sqlx::Error::RowNotFound => StorageErrorKind::Query,
        sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => StorageErrorKind::Decode,
        sqlx::Error::Migrate(_) => StorageErrorKind::Schema,
        _ => StorageErrorKind::Unavailable,
    };
    StorageError::new(kind, format!("{operation} failed: {error}"))
}

fn migrate_error(error: MigrateError) -> StorageError {
    match error {
        MigrateError::Execute(inner) => sqlx_error("apply schema", inner),
        other => StorageError::new(
            StorageErrorKind::Schema,
            format!("apply schema failed: {other}"),
        ),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<(), StorageError> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|error| {
        StorageError::new(
            StorageErrorKind::Unavailable,
            format!(
                "failed to create parent directory '{}' for database url '{database_url}': {error}",
                parent.display()
            ),
        )
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[async_trait]
impl ComplaintStore for Storage {
    async fn add(
        &self,
        name: &str,
        gender: Gender,
        comment: &str,
    ) -> Result<ComplaintId, StorageError> {
        self.add_complaint(name, gender, comment).await
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Complaint>, StorageError> {
        self.list_complaints(search).await
    }

    async fn delete(&self, id: ComplaintId) -> Result<(), StorageError> {
        self.delete_complaint(id).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
