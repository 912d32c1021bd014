/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: the credential hasher seam and its Argon2id implementation
/// - [`jwt`]: session token generation and validation
/// - [`session`]: per-request caller identity
/// - [`authorization`]: the access control guard consulted by every operation
///
/// # Example
///
/// ```no_run
/// use rollcall_shared::auth::authorization::{authorize, Action};
/// use rollcall_shared::auth::session::Session;
///
/// # fn example(header: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::from_authorization(header, "jwt-secret")?;
/// authorize(session.caller(), Action::ListTeachers, None)?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod session;
