pub mod auth;
pub mod books;
pub mod list_items;

use shelf_kernel::ModuleRegistry;

use crate::Services;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, services: &Services) -> anyhow::Result<()> {
    registry.register(auth::create_module(services.auth.clone()))?;
    registry.register(books::create_module(
        services.auth.clone(),
        services.books.clone(),
    ))?;
    registry.register(list_items::create_module(
        services.auth.clone(),
        services.list_items.clone(),
    ))?;
    Ok(())
}
