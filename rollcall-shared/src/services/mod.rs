/// School service operations
///
/// [`SchoolService`] is the single entry point for everything a client can
/// do. It owns the injected store and credential hasher; the operations are
/// split across submodules:
///
/// - [`provisioning`]: principal bootstrap, teacher and student creation
/// - [`profile`]: draft saves and final submission of student profiles
/// - [`dashboard`]: role-scoped read projections
/// - [`session`]: login and current-session lookup
///
/// Every operation takes the caller as `Option<&Caller>` and asks the access
/// control guard first.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rollcall_shared::auth::password::Argon2Hasher;
/// use rollcall_shared::services::SchoolService;
/// use rollcall_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = SchoolService::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(Argon2Hasher::default()),
/// );
///
/// // No caller: every operation is refused
/// assert!(service.list_teachers(None).await.is_err());
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use crate::auth::password::CredentialHasher;
use crate::store::SchoolStore;

pub mod dashboard;
pub mod error;
pub mod profile;
pub mod provisioning;
pub mod session;

pub use error::{ErrorKind, ServiceError, ServiceResult};

/// Handle to the school operations
///
/// Cheap to clone; both collaborators sit behind `Arc`.
#[derive(Clone)]
pub struct SchoolService {
    store: Arc<dyn SchoolStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl SchoolService {
    pub fn new(store: Arc<dyn SchoolStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// The underlying store, for health checks
    pub fn store(&self) -> &Arc<dyn SchoolStore> {
        &self.store
    }
}
