use anyhow::{anyhow, Context as _, Result};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking the server indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
/// Returns an error if the operation takes longer than `QUERY_TIMEOUT`.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Sole translator between task records and the `tasks` table.
/// Each operation is a single parameterized statement — no multi-row
/// transactions anywhere.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("tasks.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                 id          INTEGER PRIMARY KEY AUTOINCREMENT,
                 title       TEXT NOT NULL,
                 description TEXT,
                 completed   BOOLEAN NOT NULL
             )",
        )
        .execute(pool)
        .await
        .context("Failed to create tasks table")?;
        Ok(())
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT id, title, description, completed FROM tasks")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        Ok(
            sqlx::query_as("SELECT id, title, description, completed FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn insert_task(
        &self,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<TaskRow> {
        let result = sqlx::query("INSERT INTO tasks (title, description, completed) VALUES (?, ?, ?)")
            .bind(title)
            .bind(description)
            .bind(completed)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();
        self.get_task(id)
            .await?
            .ok_or_else(|| anyhow!("task not found after insert"))
    }

    /// Overwrite the row matching `id`. Returns rows affected (0 or 1).
    pub async fn update_task(
        &self,
        id: i64,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<u64> {
        let result =
            sqlx::query("UPDATE tasks SET title = ?, description = ?, completed = ? WHERE id = ?")
                .bind(title)
                .bind(description)
                .bind(completed)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Hard delete. Returns rows affected (0 or 1).
    pub async fn delete_task(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn make_storage(dir: &TempDir) -> Storage {
        Storage::new(dir.path()).await.unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_generated_id_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = make_storage(&dir).await;

        let row = storage
            .insert_task("Buy milk", Some("2%"), false)
            .await
            .unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(row.title, "Buy milk");
        assert_eq!(row.description.as_deref(), Some("2%"));
        assert!(!row.completed);

        let fetched = storage.get_task(row.id).await.unwrap().unwrap();
        assert_eq!(fetched, row);
    }

    #[tokio::test]
    async fn list_returns_empty_then_all_rows_in_storage_order() {
        let dir = TempDir::new().unwrap();
        let storage = make_storage(&dir).await;

        assert!(storage.list_tasks().await.unwrap().is_empty());

        storage.insert_task("first", None, false).await.unwrap();
        storage.insert_task("second", None, true).await.unwrap();

        let rows = storage.list_tasks().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "first");
        assert_eq!(rows[1].title, "second");
    }

    #[tokio::test]
    async fn get_missing_id_returns_none() {
        let dir = TempDir::new().unwrap();
        let storage = make_storage(&dir).await;
        assert!(storage.get_task(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_overwrites_all_fields_and_reports_rows_affected() {
        let dir = TempDir::new().unwrap();
        let storage = make_storage(&dir).await;

        let row = storage.insert_task("Buy milk", Some("2%"), false).await.unwrap();
        let affected = storage
            .update_task(row.id, "Buy milk", None, true)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let updated = storage.get_task(row.id).await.unwrap().unwrap();
        assert_eq!(updated.description, None);
        assert!(updated.completed);

        assert_eq!(storage.update_task(999, "x y z", None, false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_twice_affects_one_then_zero_rows() {
        let dir = TempDir::new().unwrap();
        let storage = make_storage(&dir).await;

        let row = storage.insert_task("Buy milk", None, false).await.unwrap();
        assert_eq!(storage.delete_task(row.id).await.unwrap(), 1);
        assert_eq!(storage.delete_task(row.id).await.unwrap(), 0);
        assert!(storage.get_task(row.id).await.unwrap().is_none());
    }
}
