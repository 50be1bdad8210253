// --- File: crates/services/slotbook_backend/src/app_state.rs ---
use slotbook_booking::BookingState;
use slotbook_common::handlers::CommonState;
use slotbook_common::services::{ServiceFactory, StoreProbe};
use slotbook_config::AppConfig;
use std::sync::Arc;

/// Application state shared by the router builder.
///
/// Each route group receives only its own slice (`CommonState`,
/// `BookingState`); the full struct exists for wiring in `main` and tests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service_factory: Arc<dyn ServiceFactory>,
    pub common: Arc<CommonState>,
    pub booking: Arc<BookingState>,
}

impl AppState {
    /// Assemble the state. The health probe checks the booking store.
    pub fn new(
        config: Arc<AppConfig>,
        service_factory: Arc<dyn ServiceFactory>,
        booking: Arc<BookingState>,
    ) -> Self {
        let store: Arc<dyn StoreProbe> = Arc::new(booking.service.repository().client().clone());
        let common = Arc::new(CommonState {
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.environment.clone(),
            store: Some(store),
        });

        Self {
            config,
            service_factory,
            common,
            booking,
        }
    }
}
