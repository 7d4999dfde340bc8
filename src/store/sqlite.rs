//! SQLite-based task store.

use super::{StoreError, TaskStore};
use crate::task::{priority, status, NewTask, Task, TaskId, TaskOrder, TaskPatch, TaskStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    priority INTEGER NOT NULL,
    due_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'new',
    category TEXT NOT NULL DEFAULT 'General'
);

CREATE INDEX IF NOT EXISTS idx_tasks_priority_due ON tasks(priority, due_date);
"#;

const TASK_SELECT_SQL: &str = "SELECT id, name, priority, due_date, status, category FROM tasks";

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
            let conn = Connection::open(&db_path)?;
            conn.execute_batch(SCHEMA)?;
            Self::run_migrations(&conn)?;
            tracing::debug!("Opened task database at {}", db_path.display());
            Ok(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run database migrations for existing databases.
    /// Tables created before categories existed lack the column.
    fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
        let has_category_column: bool = conn
            .prepare("SELECT 1 FROM pragma_table_info('tasks') WHERE name = 'category'")?
            .exists([])?;

        if !has_category_column {
            tracing::info!("Running migration: adding 'category' column to tasks table");
            conn.execute(
                "ALTER TABLE tasks ADD COLUMN category TEXT NOT NULL DEFAULT 'General'",
                [],
            )?;
        }

        Ok(())
    }

    /// Run `f` on the connection in a blocking task.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut conn)
        })
        .await?
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: TaskId::new(row.get(0)?),
        name: row.get(1)?,
        priority: row.get(2)?,
        due_date: row.get(3)?,
        status: row.get(4)?,
        category: row.get(5)?,
    })
}

fn order_clause(order: TaskOrder) -> &'static str {
    match order {
        TaskOrder::Priority => "ORDER BY priority ASC, id ASC",
        TaskOrder::PriorityThenDueDate => "ORDER BY priority ASC, due_date ASC, id ASC",
    }
}

fn load_tasks(conn: &Connection, order: TaskOrder) -> rusqlite::Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!("{} {}", TASK_SELECT_SQL, order_clause(order)))?;
    let tasks = stmt
        .query_map([], task_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Write back the priorities of the listed tasks.
fn write_priorities(conn: &Connection, tasks: &[Task], ids: &[TaskId]) -> rusqlite::Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let ids: HashSet<TaskId> = ids.iter().copied().collect();
    let mut stmt = conn.prepare("UPDATE tasks SET priority = ?1 WHERE id = ?2")?;
    for task in tasks.iter().filter(|t| ids.contains(&t.id)) {
        stmt.execute(params![task.priority, task.id.get()])?;
    }
    Ok(())
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn refresh_statuses(&self, today: NaiveDate) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut tasks = load_tasks(&tx, TaskOrder::Priority)?;
            let changed = status::refresh(&mut tasks, today);
            if !changed.is_empty() {
                let ids: HashSet<TaskId> = changed.iter().copied().collect();
                let mut stmt = tx.prepare("UPDATE tasks SET status = ?1 WHERE id = ?2")?;
                for task in tasks.iter().filter(|t| ids.contains(&t.id)) {
                    stmt.execute(params![task.status, task.id.get()])?;
                }
            }
            tx.commit()?;
            if !changed.is_empty() {
                tracing::debug!("Status refresh updated {} task(s)", changed.len());
            }
            Ok(changed.len())
        })
        .await
    }

    async fn list_tasks(&self, order: TaskOrder) -> Result<Vec<Task>, StoreError> {
        self.with_conn(move |conn| Ok(load_tasks(conn, order)?))
            .await
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        self.with_conn(move |conn| {
            let task = conn
                .query_row(
                    &format!("{} WHERE id = ?1", TASK_SELECT_SQL),
                    params![id.get()],
                    task_from_row,
                )
                .optional()?;
            Ok(task)
        })
        .await
    }

    async fn create_task(&self, task: NewTask, today: NaiveDate) -> Result<Task, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut existing = load_tasks(&tx, TaskOrder::Priority)?;
            let shifted = priority::shift_for_insert(&mut existing, task.priority());
            write_priorities(&tx, &existing, &shifted)?;

            let initial = status::derive(task.due_date(), TaskStatus::New, today);
            tx.execute(
                "INSERT INTO tasks (name, priority, due_date, status, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    task.name(),
                    task.priority(),
                    task.due_date(),
                    initial,
                    task.category(),
                ],
            )?;
            let id = TaskId::new(tx.last_insert_rowid());
            tx.commit()?;

            tracing::info!(
                "Created task {} at priority {} ({} shifted)",
                id,
                task.priority(),
                shifted.len()
            );
            Ok(task.into_task(id, today))
        })
        .await
    }

    async fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
        today: NaiveDate,
    ) -> Result<Option<Task>, StoreError> {
        patch.validate()?;
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut tasks = load_tasks(&tx, TaskOrder::Priority)?;
            let Some(pos) = tasks.iter().position(|t| t.id == id) else {
                return Ok(None);
            };

            if let Some(requested) = patch.priority {
                let moved = priority::shift_for_move(&mut tasks, id, requested);
                write_priorities(&tx, &tasks, &moved)?;
            }
            let task = &mut tasks[pos];
            patch.apply_fields(task, today);

            tx.execute(
                "UPDATE tasks SET name = ?1, priority = ?2, due_date = ?3, status = ?4, category = ?5
                 WHERE id = ?6",
                params![
                    task.name,
                    task.priority,
                    task.due_date,
                    task.status,
                    task.category,
                    task.id.get(),
                ],
            )?;
            let updated = task.clone();
            tx.commit()?;
            Ok(Some(updated))
        })
        .await
    }

    async fn complete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let rows = conn.execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                params![TaskStatus::Completed, id.get()],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.get()])?;
            Ok(rows > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unknown_status_text_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let store = SqliteTaskStore::new(dir.path().join("tasks.db")).await.unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO tasks (name, priority, due_date, status) VALUES ('x', 1, '2024-01-01', 'archived')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let err = store.list_tasks(TaskOrder::Priority).await.unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)), "{err}");
    }

    #[tokio::test]
    async fn test_migration_adds_category_to_old_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    priority INTEGER NOT NULL,
                    due_date TEXT NOT NULL,
                    status TEXT NOT NULL
                );
                INSERT INTO tasks (name, priority, due_date, status) VALUES ('old', 1, '2024-01-01', 'new');",
            )
            .unwrap();
        }

        let store = SqliteTaskStore::new(path).await.unwrap();
        let tasks = store.list_tasks(TaskOrder::Priority).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].category, "General");
    }

    #[tokio::test]
    async fn test_dates_are_stored_as_iso_text() {
        let dir = TempDir::new().unwrap();
        let store = SqliteTaskStore::new(dir.path().join("tasks.db")).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let task = NewTask::new("iso", 1, today, None).unwrap();
        let created = store.create_task(task, today).await.unwrap();

        let raw: String = store
            .with_conn(move |conn| {
                Ok(conn.query_row(
                    "SELECT due_date FROM tasks WHERE id = ?1",
                    params![created.id.get()],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(raw, "2024-03-01");
    }
}
