/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded schema migrations
///
/// Row types and their queries live in [`crate::models`]; the
/// [`crate::store::PgStore`] ties them together behind the store trait.

pub mod migrations;
pub mod pool;
