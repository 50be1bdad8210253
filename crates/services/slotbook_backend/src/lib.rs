// --- File: crates/services/slotbook_backend/src/lib.rs ---
//! Wiring for the Slotbook server: service factory, shared state and the
//! application router. `main.rs` only loads config and serves.

pub mod app;
pub mod app_state;
pub mod service_factory;

pub use app::build_app;
pub use app_state::AppState;
pub use service_factory::SlotbookServiceFactory;
