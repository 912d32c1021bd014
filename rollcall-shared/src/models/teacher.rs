/// Teacher model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teachers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     employee_id VARCHAR(64) NOT NULL CONSTRAINT teachers_employee_id_key UNIQUE,
///     account_id UUID NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Teacher row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,

    /// School-issued employee number, globally unique
    pub employee_id: String,

    /// Owning account (1:1)
    pub account_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a teacher row
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub name: String,
    pub employee_id: String,
}

/// Public projection of a teacher joined with its account email
///
/// This is what principals see and what `CreateTeacher` returns. It carries
/// no credential data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeacherView {
    pub id: Uuid,
    pub name: String,
    pub employee_id: String,
    pub email: String,
}

impl Teacher {
    /// Inserts a teacher row owned by `account_id`
    ///
    /// # Errors
    ///
    /// Fails on a duplicate employee ID (`teachers_employee_id_key`).
    pub async fn create<'e, E>(
        executor: E,
        account_id: Uuid,
        data: &NewTeacher,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (name, employee_id, account_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, employee_id, account_id, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.employee_id)
        .bind(account_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, name, employee_id, account_id, created_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds the teacher row linked to an account
    pub async fn find_by_account_id<'e, E>(
        executor: E,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, name, employee_id, account_id, created_at
            FROM teachers
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn employee_id_exists<'e, E>(
        executor: E,
        employee_id: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM teachers WHERE employee_id = $1)")
            .bind(employee_id)
            .fetch_one(executor)
            .await
    }
}

impl TeacherView {
    /// Loads the public view of a single teacher
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TeacherView>(
            r#"
            SELECT t.id, t.name, t.employee_id, a.email
            FROM teachers t
            JOIN accounts a ON a.id = t.account_id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists every teacher, ordered by name
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TeacherView>(
            r#"
            SELECT t.id, t.name, t.employee_id, a.email
            FROM teachers t
            JOIN accounts a ON a.id = t.account_id
            ORDER BY t.name, t.employee_id
            "#,
        )
        .fetch_all(executor)
        .await
    }
}
