/// Student model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE students (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     roll_number VARCHAR(64) NOT NULL CONSTRAINT students_roll_number_key UNIQUE,
///     account_id UUID NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
///     teacher_id UUID NOT NULL
///         CONSTRAINT students_teacher_id_fkey REFERENCES teachers(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Student row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,

    /// Globally unique roll number
    pub roll_number: String,

    /// Owning account (1:1)
    pub account_id: Uuid,

    /// Assigned teacher; never null
    pub teacher_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a student row
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub roll_number: String,
    pub teacher_id: Uuid,
}

/// Public projection of a student joined with its account email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentView {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub teacher_id: Uuid,
}

impl Student {
    /// Inserts a student row owned by `account_id`
    ///
    /// # Errors
    ///
    /// Fails on a duplicate roll number (`students_roll_number_key`) or when
    /// the teacher does not exist (`students_teacher_id_fkey`).
    pub async fn create<'e, E>(
        executor: E,
        account_id: Uuid,
        data: &NewStudent,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, roll_number, account_id, teacher_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, roll_number, account_id, teacher_id, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.roll_number)
        .bind(account_id)
        .bind(data.teacher_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, roll_number, account_id, teacher_id, created_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds the student row linked to an account
    pub async fn find_by_account_id<'e, E>(
        executor: E,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, roll_number, account_id, teacher_id, created_at
            FROM students
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn roll_number_exists<'e, E>(
        executor: E,
        roll_number: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE roll_number = $1)")
            .bind(roll_number)
            .fetch_one(executor)
            .await
    }
}

impl StudentView {
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, StudentView>(
            r#"
            SELECT s.id, s.name, s.roll_number, a.email, s.teacher_id
            FROM students s
            JOIN accounts a ON a.id = s.account_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists the students assigned to a teacher, ordered by roll number
    pub async fn list_by_teacher<'e, E>(
        executor: E,
        teacher_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, StudentView>(
            r#"
            SELECT s.id, s.name, s.roll_number, a.email, s.teacher_id
            FROM students s
            JOIN accounts a ON a.id = s.account_id
            WHERE s.teacher_id = $1
            ORDER BY s.roll_number
            "#,
        )
        .bind(teacher_id)
        .fetch_all(executor)
        .await
    }
}
