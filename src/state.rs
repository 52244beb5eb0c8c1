use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{AppConfig, SessionConfig, MEMORY_DATABASE_URL};
use crate::db;
use crate::meals::repo::{MealStore, PgMealStore};
use crate::memory::{MemoryMealStore, MemoryUserStore};
use crate::users::repo::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub meals: Arc<dyn MealStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        if config.uses_memory_store() {
            tracing::warn!("DATABASE_URL=memory; data is lost on restart");
            return Ok(Self::in_memory_with(config));
        }

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;
        Ok(Self::from_pool(pool, config))
    }

    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgMealStore::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        meals: Arc<dyn MealStore>,
    ) -> Self {
        Self {
            config,
            users,
            meals,
        }
    }

    /// Fresh, empty in-process state with default settings.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            database_url: MEMORY_DATABASE_URL.into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            session: SessionConfig::default(),
        });
        Self::in_memory_with(config)
    }

    fn in_memory_with(config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryMealStore::default()),
        )
    }
}
