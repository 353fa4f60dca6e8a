//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostService;
use quill_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use quill_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService, default_pipeline,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Which backend the stores live in, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    fn assemble(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        jwt: JwtConfig,
        storage: &'static str,
    ) -> Self {
        Self {
            posts: PostService::new(posts, default_pipeline()),
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            storage,
        }
    }

    /// State backed by in-memory stores. Data is lost on restart.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::assemble(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            jwt,
            "memory",
        )
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let state = match Self::connect(config).await {
            Some(state) => state,
            None => Self::in_memory(config.jwt.clone()),
        };

        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match Self::postgres(db_config, config.auto_migrate, config.jwt.clone()).await {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Option<Self> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        None
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        db_config: &quill_infra::database::DatabaseConfig,
        auto_migrate: bool,
        jwt: JwtConfig,
    ) -> Result<Self, migration::DbErr> {
        use migration::{Migrator, MigratorTrait};
        use quill_infra::{PostgresPostRepository, PostgresUserRepository};

        let conn = quill_infra::database::connect(db_config).await?;

        if auto_migrate {
            Migrator::up(&conn, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self::assemble(
            Arc::new(PostgresPostRepository::new(conn.clone())),
            Arc::new(PostgresUserRepository::new(conn)),
            jwt,
            "postgres",
        ))
    }
}
