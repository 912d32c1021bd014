/// Database models for Rollcall
///
/// Each model owns its SQL. Query functions accept any `PgExecutor`, so the
/// same call works against the pool or inside an open transaction.
///
/// # Models
///
/// - `account`: authenticatable identities and the closed [`account::Role`] enum
/// - `teacher`: teacher rows and their public view
/// - `student`: student rows and their public view
/// - `profile`: student profiles and the completeness rules
///
/// # Example
///
/// ```no_run
/// use rollcall_shared::models::profile::{Profile, ProfileFields};
/// use rollcall_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(student_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let fields = ProfileFields {
///     full_name: "Jane Doe".to_string(),
///     ..Default::default()
/// };
///
/// let profile = Profile::upsert(&pool, student_id, &fields).await?;
/// assert_eq!(profile.fields.completion_percent(), 25);
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod profile;
pub mod student;
pub mod teacher;
