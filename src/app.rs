use std::future::Future;

use anyhow::Context;
use axum::Router;
use sqlx::SqlitePool;

use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// A fully initialized application: settings, pool and registered modules.
pub struct App {
    settings: Settings,
    pool: SqlitePool,
    registry: ModuleRegistry,
}

impl App {
    /// Connect to the configured database and initialize every module.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let pool = libris_db::connect(&settings.database)
            .await
            .with_context(|| "failed to open database")?;
        Self::with_pool(settings, pool).await
    }

    /// Initialize every module over an existing pool.
    pub async fn with_pool(settings: Settings, pool: SqlitePool) -> anyhow::Result<Self> {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &pool)?;

        registry
            .init_all(&InitCtx {
                settings: &settings,
            })
            .await?;

        Ok(Self {
            settings,
            pool,
            registry,
        })
    }

    /// Apply pending module migrations; returns how many ran.
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let migrations = self.registry.collect_migrations();
        let applied = libris_db::run_migrations(&self.pool, &migrations).await?;
        tracing::info!(applied, total = migrations.len(), "migrations complete");
        Ok(applied)
    }

    pub fn router(&self) -> Router {
        libris_http::build_router(&self.registry, &self.settings)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Migrate, start modules, serve HTTP until `shutdown`, then stop
    /// modules and close the pool.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.migrate().await?;

        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.start_all(&ctx).await?;

        let served = libris_http::start_server(&self.registry, &self.settings, shutdown).await;
        let stopped = self.registry.stop_all().await;
        self.pool.close().await;

        served?;
        stopped
    }
}

/// Resolves on Ctrl-C, or immediately if the signal handler can't be
/// installed.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
