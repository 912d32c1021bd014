/// Student profile model, completeness rules and database operations
///
/// A profile holds four free-text fields a teacher fills in for a student.
/// Whether a profile is empty, partial or complete is never stored: it is
/// derived from the fields by [`ProfileFields::filled_count`], which both the
/// write path (final-submission validation) and the read path (completion
/// percentage) go through.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE student_profiles (
///     student_id UUID PRIMARY KEY
///         CONSTRAINT student_profiles_student_id_fkey REFERENCES students(id) ON DELETE CASCADE,
///     full_name TEXT NOT NULL DEFAULT '',
///     address TEXT NOT NULL DEFAULT '',
///     father_name TEXT NOT NULL DEFAULT '',
///     mother_name TEXT NOT NULL DEFAULT '',
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Number of fields that make up a profile
pub const FIELD_COUNT: usize = 4;

/// Derived completion state of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileState {
    /// No field filled (or no profile row yet)
    Empty,

    /// Some but not all fields filled
    Partial,

    /// Every field filled
    Complete,
}

/// The four profile fields, always present (empty string when unset)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileFields {
    pub full_name: String,
    pub address: String,
    pub father_name: String,
    pub mother_name: String,
}

impl ProfileFields {
    /// Field names paired with their values, in display order
    pub fn entries(&self) -> [(&'static str, &str); FIELD_COUNT] {
        [
            ("full_name", self.full_name.as_str()),
            ("address", self.address.as_str()),
            ("father_name", self.father_name.as_str()),
            ("mother_name", self.mother_name.as_str()),
        ]
    }

    /// Counts fields that are non-empty after trimming whitespace
    pub fn filled_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .count()
    }

    /// Names of the fields that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() == FIELD_COUNT
    }

    /// Rounded percentage of filled fields (0, 25, 50, 75 or 100)
    ///
    /// # Example
    ///
    /// ```
    /// use rollcall_shared::models::profile::ProfileFields;
    ///
    /// let fields = ProfileFields {
    ///     full_name: "Jane".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(fields.completion_percent(), 25);
    /// ```
    pub fn completion_percent(&self) -> u8 {
        (100.0 * self.filled_count() as f64 / FIELD_COUNT as f64).round() as u8
    }

    pub fn state(&self) -> ProfileState {
        match self.filled_count() {
            0 => ProfileState::Empty,
            FIELD_COUNT => ProfileState::Complete,
            _ => ProfileState::Partial,
        }
    }
}

/// Profile fields as submitted by a client
///
/// Any field may be missing or `null`; [`ProfileInput::into_fields`] turns
/// those into empty strings so a save always overwrites all four columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
}

impl ProfileInput {
    pub fn into_fields(self) -> ProfileFields {
        ProfileFields {
            full_name: self.full_name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            father_name: self.father_name.unwrap_or_default(),
            mother_name: self.mother_name.unwrap_or_default(),
        }
    }
}

/// Stored profile row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// Owning student (1:1, primary key)
    pub student_id: Uuid,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: ProfileFields,

    pub updated_at: DateTime<Utc>,
}

/// Completion percentage of an optional profile; a missing row counts as empty
pub fn completion_percent(profile: Option<&Profile>) -> u8 {
    profile.map_or(0, |p| p.fields.completion_percent())
}

/// State of an optional profile; a missing row is [`ProfileState::Empty`]
pub fn profile_state(profile: Option<&Profile>) -> ProfileState {
    profile.map_or(ProfileState::Empty, |p| p.fields.state())
}

impl Profile {
    /// Inserts or fully overwrites the profile of a student
    ///
    /// Runs as a single `INSERT ... ON CONFLICT` statement keyed on
    /// `student_id`, so overlapping saves never produce two rows.
    ///
    /// # Errors
    ///
    /// Fails when the student does not exist (`student_profiles_student_id_fkey`).
    pub async fn upsert<'e, E>(
        executor: E,
        student_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO student_profiles (student_id, full_name, address, father_name, mother_name)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                address = EXCLUDED.address,
                father_name = EXCLUDED.father_name,
                mother_name = EXCLUDED.mother_name,
                updated_at = NOW()
            RETURNING student_id, full_name, address, father_name, mother_name, updated_at
            "#,
        )
        .bind(student_id)
        .bind(&fields.full_name)
        .bind(&fields.address)
        .bind(&fields.father_name)
        .bind(&fields.mother_name)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_student_id<'e, E>(
        executor: E,
        student_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT student_id, full_name, address, father_name, mother_name, updated_at
            FROM student_profiles
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(executor)
        .await
    }

    /// Lists the existing profiles of every student assigned to a teacher
    pub async fn list_by_teacher<'e, E>(
        executor: E,
        teacher_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT p.student_id, p.full_name, p.address, p.father_name, p.mother_name, p.updated_at
            FROM student_profiles p
            JOIN students s ON s.id = p.student_id
            WHERE s.teacher_id = $1
            "#,
        )
        .bind(teacher_id)
        .fetch_all(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(full_name: &str, address: &str, father_name: &str, mother_name: &str) -> ProfileFields {
        ProfileFields {
            full_name: full_name.to_string(),
            address: address.to_string(),
            father_name: father_name.to_string(),
            mother_name: mother_name.to_string(),
        }
    }

    #[test]
    fn test_completion_percent_steps() {
        assert_eq!(fields("", "", "", "").completion_percent(), 0);
        assert_eq!(fields("Jane", "", "", "").completion_percent(), 25);
        assert_eq!(fields("Jane", "1 Elm St", "", "").completion_percent(), 50);
        assert_eq!(fields("Jane", "1 Elm St", "John", "").completion_percent(), 75);
        assert_eq!(fields("Jane", "1 Elm St", "John", "Mary").completion_percent(), 100);
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let f = fields("   ", "\t", "John", "\n");
        assert_eq!(f.filled_count(), 1);
        assert_eq!(f.missing_fields(), vec!["full_name", "address", "mother_name"]);
        assert!(!f.is_complete());
    }

    #[test]
    fn test_state_is_derived() {
        assert_eq!(ProfileFields::default().state(), ProfileState::Empty);
        assert_eq!(fields("Jane", "", "", "").state(), ProfileState::Partial);
        assert_eq!(fields("a", "b", "c", "d").state(), ProfileState::Complete);
    }

    #[test]
    fn test_input_coerces_missing_and_null_to_empty() {
        let input: ProfileInput =
            serde_json::from_str(r#"{"full_name": "Jane", "address": null}"#).unwrap();
        let f = input.into_fields();

        assert_eq!(f.full_name, "Jane");
        assert_eq!(f.address, "");
        assert_eq!(f.father_name, "");
        assert_eq!(f.mother_name, "");
    }

    #[test]
    fn test_missing_profile_is_zero_percent() {
        assert_eq!(completion_percent(None), 0);
    }

    #[test]
    fn test_missing_profile_is_empty_state() {
        assert_eq!(profile_state(None), ProfileState::Empty);
    }

    #[test]
    fn test_profile_serializes_flat() {
        let profile = Profile {
            student_id: Uuid::new_v4(),
            fields: fields("Jane", "", "", ""),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["full_name"], "Jane");
        assert_eq!(json["mother_name"], "");
        assert!(json.get("fields").is_none());
    }
}
