/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and current session
/// - `teachers`: Teacher provisioning and listing (principal)
/// - `students`: Student provisioning (principal)
/// - `teacher_students`: A teacher's own students and their profiles
/// - `student`: A student's own record
///
/// Handlers are thin: they extract the session and body, call one
/// [`SchoolService`](rollcall_shared::services::SchoolService) operation, and
/// wrap the result. Every access decision is made by the service.

pub mod auth;
pub mod health;
pub mod student;
pub mod students;
pub mod teacher_students;
pub mod teachers;
