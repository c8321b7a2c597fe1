//! Application state - shared across all handlers.

use std::sync::Arc;

use board_core::ports::{PasswordService, TokenService};
use board_core::services::Repositories;
use board_core::{BoardPolicy, BoardService};
use board_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use board_infra::database::{
    DatabaseConnections, PostgresBadgeRepository, PostgresPostRepository,
    PostgresReportRepository, PostgresUserRepository, PostgresVoteRepository,
};

use crate::config::AppConfig;

/// Which store backs the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BoardService>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub storage: Storage,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store
    /// when no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let connections = Arc::new(connections);
                        let mut state = Self::assemble(
                            postgres_repositories(&connections),
                            config.policy.clone(),
                            tokens,
                            passwords,
                            Storage::Postgres,
                        );
                        state.db = Some(connections);
                        tracing::info!("Application state initialized (postgres)");
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("Built without the postgres feature; DATABASE_URL is ignored.");
            }
        }

        let state = Self::assemble(
            memory_repositories(Arc::new(InMemoryStore::new())),
            config.policy.clone(),
            tokens,
            passwords,
            Storage::Memory,
        );
        tracing::info!("Application state initialized (memory)");
        state
    }

    pub fn assemble(
        repos: Repositories,
        policy: BoardPolicy,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        storage: Storage,
    ) -> Self {
        Self {
            board: Arc::new(BoardService::new(repos, policy)),
            tokens,
            passwords,
            storage,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

/// Every repository served by one in-memory store.
pub fn memory_repositories(store: Arc<InMemoryStore>) -> Repositories {
    Repositories {
        users: store.clone(),
        posts: store.clone(),
        reports: store.clone(),
        votes: store.clone(),
        badges: store,
    }
}

#[cfg(feature = "postgres")]
fn postgres_repositories(connections: &DatabaseConnections) -> Repositories {
    let db = &connections.main;
    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        reports: Arc::new(PostgresReportRepository::new(db.clone())),
        votes: Arc::new(PostgresVoteRepository::new(db.clone())),
        badges: Arc::new(PostgresBadgeRepository::new(db.clone())),
    }
}
