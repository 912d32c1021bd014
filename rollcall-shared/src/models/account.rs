/// Account model and database operations
///
/// An account is an authenticatable identity: an email, an Argon2id credential
/// hash and a role. Teachers and students each own exactly one account; the
/// principal's account stands alone.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('PRINCIPAL', 'TEACHER', 'STUDENT');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL CONSTRAINT accounts_email_key UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role account_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Emails are normalized with [`normalize_email`] before they reach the table,
/// so the plain unique constraint is enough for case-insensitive uniqueness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use uuid::Uuid;

/// Closed set of roles an account can hold
///
/// The role is fixed when the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// School administrator: provisions teachers and students
    Principal,

    /// Completes profiles for the students assigned to them
    Teacher,

    /// Reads their own record
    Student,
}

impl Role {
    /// Converts role to its wire/database name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Principal => "PRINCIPAL",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account row
///
/// Never serialized into API responses as a whole: the credential hash stays
/// inside the service layer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Normalized (trimmed, lowercase) email address
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,

    /// Role assigned at creation
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Normalized email address
    pub email: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role to assign
    pub role: Role,
}

/// Trims and lowercases an email address
///
/// # Example
///
/// ```
/// use rollcall_shared::models::account::normalize_email;
///
/// assert_eq!(normalize_email("  Jane.Doe@School.EDU "), "jane.doe@school.edu");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Account {
    /// Inserts a new account
    ///
    /// Accepts any Postgres executor so it can run inside the same transaction
    /// as the teacher/student row that owns the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken (`accounts_email_key`)
    /// or the database connection fails.
    pub async fn create<'e, E>(executor: E, data: &NewAccount) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(executor)
        .await
    }

    /// Finds an account by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds an account by (already normalized) email
    pub async fn find_by_email<'e, E>(
        executor: E,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Checks whether an email is already registered
    pub async fn email_exists<'e, E>(executor: E, email: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email)
            .fetch_one(executor)
            .await
    }
}
