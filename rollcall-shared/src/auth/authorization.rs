/// Access control guard
///
/// Every service operation asks [`authorize`] before touching the store. The
/// guard is a pure function of the caller, the requested [`Action`] and,
/// where it matters, the teacher/student [`Ownership`] relation.
///
/// # Rules
///
/// Checked in order, first failure wins:
///
/// 1. No caller → [`AuthzError::Unauthenticated`]
/// 2. `CreateTeacher`, `CreateStudent`, `ListTeachers` → principal only
/// 3. `ViewOwnProfile` → student only (the operation takes no student id, so a
///    student can only ever reach their own record)
/// 4. `ListOwnStudents`, `ViewStudent`, `WriteStudentProfile` → teacher only,
///    and the student must be assigned to that teacher, else
///    [`AuthzError::ForbiddenRelationship`]
///
/// Anything else is denied: [`Action`] is a closed enum and every variant maps
/// to exactly one role.
///
/// # Example
///
/// ```
/// use rollcall_shared::auth::authorization::{authorize, Action, AuthzError};
/// use rollcall_shared::auth::session::Caller;
/// use rollcall_shared::models::account::Role;
/// use uuid::Uuid;
///
/// let principal = Caller::new(Uuid::new_v4(), Role::Principal);
/// assert!(authorize(Some(&principal), Action::CreateTeacher, None).is_ok());
///
/// let student = Caller::new(Uuid::new_v4(), Role::Student);
/// assert!(matches!(
///     authorize(Some(&student), Action::CreateTeacher, None),
///     Err(AuthzError::ForbiddenRole { .. })
/// ));
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::session::Caller;
use crate::models::account::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// No caller identity was resolved
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller's role may not perform the action
    #[error("Role {role} may not {action}")]
    ForbiddenRole { action: Action, role: Role },

    /// The caller is a teacher, but not the one assigned to the student
    #[error("This student is not assigned to you")]
    ForbiddenRelationship,
}

/// Operations subject to access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateTeacher,
    CreateStudent,
    ListTeachers,
    ListOwnStudents,
    ViewStudent,
    WriteStudentProfile,
    ViewOwnProfile,
}

impl Action {
    /// The only role allowed to perform this action
    pub fn required_role(&self) -> Role {
        match self {
            Action::CreateTeacher | Action::CreateStudent | Action::ListTeachers => {
                Role::Principal
            }
            Action::ListOwnStudents | Action::ViewStudent | Action::WriteStudentProfile => {
                Role::Teacher
            }
            Action::ViewOwnProfile => Role::Student,
        }
    }

    /// Whether the action is limited to the caller's assigned students
    pub fn requires_assignment(&self) -> bool {
        matches!(
            self,
            Action::ListOwnStudents | Action::ViewStudent | Action::WriteStudentProfile
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateTeacher => "create teachers",
            Action::CreateStudent => "create students",
            Action::ListTeachers => "list teachers",
            Action::ListOwnStudents => "list students",
            Action::ViewStudent => "view students",
            Action::WriteStudentProfile => "write student profiles",
            Action::ViewOwnProfile => "view a student profile",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Teacher/student relation for assignment-scoped actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    /// Teacher record of the caller
    pub caller_teacher_id: Uuid,

    /// Teacher the target student is assigned to
    pub student_teacher_id: Uuid,
}

impl Ownership {
    pub fn new(caller_teacher_id: Uuid, student_teacher_id: Uuid) -> Self {
        Self {
            caller_teacher_id,
            student_teacher_id,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.caller_teacher_id == self.student_teacher_id
    }
}

/// Decides whether `caller` may perform `action`
///
/// `ownership` is consulted only for assignment-scoped actions. Passing
/// `None` runs the role gate alone; operations call the guard again with the
/// ownership once the target student has been loaded.
///
/// Returns the caller on success so operations can keep using it.
pub fn authorize(
    caller: Option<&Caller>,
    action: Action,
    ownership: Option<Ownership>,
) -> Result<&Caller, AuthzError> {
    let caller = caller.ok_or(AuthzError::Unauthenticated)?;

    if caller.role != action.required_role() {
        tracing::warn!(
            account_id = %caller.account_id,
            role = %caller.role,
            action = %action,
            "Access denied: wrong role"
        );
        return Err(AuthzError::ForbiddenRole {
            action,
            role: caller.role,
        });
    }

    if action.requires_assignment() {
        if let Some(ownership) = ownership {
            if !ownership.is_assigned() {
                tracing::warn!(
                    account_id = %caller.account_id,
                    teacher_id = %ownership.caller_teacher_id,
                    action = %action,
                    "Access denied: student assigned to another teacher"
                );
                return Err(AuthzError::ForbiddenRelationship);
            }
        }
    }

    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 7] = [
        Action::CreateTeacher,
        Action::CreateStudent,
        Action::ListTeachers,
        Action::ListOwnStudents,
        Action::ViewStudent,
        Action::WriteStudentProfile,
        Action::ViewOwnProfile,
    ];

    fn caller(role: Role) -> Caller {
        Caller::new(Uuid::new_v4(), role)
    }

    #[test]
    fn test_no_caller_is_unauthenticated_for_every_action() {
        for action in ALL_ACTIONS {
            assert_eq!(
                authorize(None, action, None).unwrap_err(),
                AuthzError::Unauthenticated
            );
        }
    }

    #[test]
    fn test_each_action_allows_exactly_one_role() {
        for action in ALL_ACTIONS {
            for role in [Role::Principal, Role::Teacher, Role::Student] {
                let c = caller(role);
                let result = authorize(Some(&c), action, None);

                if role == action.required_role() {
                    assert!(result.is_ok(), "{:?} should allow {:?}", action, role);
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        AuthzError::ForbiddenRole { action, role },
                        "{:?} should deny {:?}",
                        action,
                        role
                    );
                }
            }
        }
    }

    #[test]
    fn test_principal_actions() {
        let principal = caller(Role::Principal);
        assert!(authorize(Some(&principal), Action::CreateTeacher, None).is_ok());
        assert!(authorize(Some(&principal), Action::CreateStudent, None).is_ok());
        assert!(authorize(Some(&principal), Action::ListTeachers, None).is_ok());
        assert!(authorize(Some(&principal), Action::ViewStudent, None).is_err());
    }

    #[test]
    fn test_assigned_teacher_passes_ownership() {
        let teacher = caller(Role::Teacher);
        let teacher_id = Uuid::new_v4();
        let ownership = Ownership::new(teacher_id, teacher_id);

        assert!(authorize(Some(&teacher), Action::ViewStudent, Some(ownership)).is_ok());
        assert!(authorize(Some(&teacher), Action::WriteStudentProfile, Some(ownership)).is_ok());
    }

    #[test]
    fn test_other_teacher_is_forbidden_relationship() {
        let teacher = caller(Role::Teacher);
        let ownership = Ownership::new(Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(
            authorize(Some(&teacher), Action::WriteStudentProfile, Some(ownership)).unwrap_err(),
            AuthzError::ForbiddenRelationship
        );
        assert_eq!(
            authorize(Some(&teacher), Action::ViewStudent, Some(ownership)).unwrap_err(),
            AuthzError::ForbiddenRelationship
        );
    }

    #[test]
    fn test_role_is_checked_before_relationship() {
        let student = caller(Role::Student);
        let ownership = Ownership::new(Uuid::new_v4(), Uuid::new_v4());

        assert!(matches!(
            authorize(Some(&student), Action::ViewStudent, Some(ownership)),
            Err(AuthzError::ForbiddenRole { .. })
        ));
    }

    #[test]
    fn test_ownership_ignored_for_unscoped_actions() {
        let principal = caller(Role::Principal);
        let ownership = Ownership::new(Uuid::new_v4(), Uuid::new_v4());

        assert!(authorize(Some(&principal), Action::ListTeachers, Some(ownership)).is_ok());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::ForbiddenRole {
            action: Action::CreateTeacher,
            role: Role::Student,
        };
        assert_eq!(err.to_string(), "Role STUDENT may not create teachers");
        assert!(AuthzError::ForbiddenRelationship.to_string().contains("not assigned"));
    }
}
