//! shelf application library
//!
//! Wires the stores, services, and HTTP modules together. `Services` is the
//! dependency-injection seam: tests build one over in-memory stores.

pub mod catalogue;
pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use shelf_auth::AuthService;
use shelf_db::{BookStore, InMemoryBookStore, InMemoryCredentialStore, InMemoryListItemStore};
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use modules::list_items::service::ListItemService;

/// Shared services handed to every module
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub books: Arc<dyn BookStore>,
    pub list_items: Arc<ListItemService>,
}

impl Services {
    /// Services over in-memory stores, with the book store seeded from
    /// `catalogue.seed_path` when configured.
    pub fn in_memory(settings: &Settings) -> anyhow::Result<Self> {
        let books = match &settings.catalogue.seed_path {
            Some(path) => InMemoryBookStore::from_books(catalogue::load(path)?),
            None => InMemoryBookStore::new(),
        };
        Self::with_books(settings, Arc::new(books))
    }

    pub fn with_books(settings: &Settings, books: Arc<dyn BookStore>) -> anyhow::Result<Self> {
        let auth = AuthService::from_settings(Arc::new(InMemoryCredentialStore::new()), &settings.auth)
            .context("failed to build auth service")?;
        let list_items = ListItemService::new(Arc::new(InMemoryListItemStore::new()), books.clone());

        Ok(Self {
            auth: Arc::new(auth),
            books,
            list_items: Arc::new(list_items),
        })
    }
}

/// Registry with every application module registered
pub fn registry(services: &Services) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, services)?;
    Ok(registry)
}

/// Run the server until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        "shelf bootstrap starting"
    );

    let services = Services::in_memory(&settings)?;
    let registry = registry(&services)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;
    tracing::info!("shelf bootstrap complete");

    let served = shelf_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
