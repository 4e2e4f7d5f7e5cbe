use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Context handed to modules on `init` and `start`
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// A schema change contributed by a module.
///
/// `up` is plain SQL applied once against the relational store and may hold
/// several `;`-separated statements. `(module name, id)` identifies it in the
/// `_migrations` ledger, so ids must never be reused.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A unit of functionality that owns routes, an OpenAPI fragment and a schema
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name; also the path segment the routes are nested under
    fn name(&self) -> &'static str;

    /// Runs once at startup, before any migration
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router nested under `/{name}`
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` and `components.schemas`; paths are
    /// relative to the module mount point
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations in the order they must be applied
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Runs after migrations have been applied
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs on shutdown, in reverse registration order
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
