/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use rollcall_api::{app::AppState, config::Config};
/// use rollcall_shared::auth::password::Argon2Hasher;
/// use rollcall_shared::services::SchoolService;
/// use rollcall_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let school = SchoolService::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(Argon2Hasher::new(config.hasher.into())),
/// );
/// let app = rollcall_api::app::build_router(AppState::new(school, config));
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::session_layer},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use rollcall_shared::services::SchoolService;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Both fields are reference-counted, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Domain operations over the configured store
    pub school: SchoolService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(school: SchoolService, config: Config) -> Self {
        Self {
            school,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                              # public
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /login                       # public
///     │   └── GET  /session                     # any role
///     ├── POST /teachers                        # PRINCIPAL
///     ├── GET  /teachers                        # PRINCIPAL
///     ├── POST /students                        # PRINCIPAL
///     ├── /teacher/students/
///     │   ├── GET  /                            # TEACHER
///     │   ├── GET  /:id                         # TEACHER, assigned
///     │   └── POST /:id/profile                 # TEACHER, assigned
///     └── GET  /student/profile                 # STUDENT
/// ```
///
/// Role checks happen inside the service operations, not in the router:
/// every `/v1` route only resolves the session.
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Session resolution (`/v1` only)
/// 2. Logging (tower-http TraceLayer)
/// 3. Response compression (gzip/br when the client asks)
/// 4. CORS (tower-http CorsLayer)
/// 5. Security headers
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/session", get(routes::auth::session));

    let teacher_routes = Router::new()
        .route("/students", get(routes::teacher_students::list_students))
        .route("/students/:id", get(routes::teacher_students::view_student))
        .route(
            "/students/:id/profile",
            post(routes::teacher_students::save_profile),
        );

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .route(
            "/teachers",
            post(routes::teachers::create_teacher).get(routes::teachers::list_teachers),
        )
        .route("/students", post(routes::students::create_student))
        .nest("/teacher", teacher_routes)
        .route("/student/profile", get(routes::student::view_own_profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
