use std::sync::Arc;

use erpbench_infra::InMemoryFacade;

/// Services shared by every handler.
pub type AppServices = InMemoryFacade;

pub fn build_services() -> Arc<AppServices> {
    tracing::info!("wiring in-memory stores");
    Arc::new(InMemoryFacade::in_memory())
}
