// --- File: crates/slotbook_booking/src/lib.rs ---
// Declare modules within this crate
pub mod clock;
pub mod doc;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod slots;

pub use clock::{Clock, FixedClock, SystemClock};
pub use handlers::BookingState;
pub use logic::BookingService;
pub use routes::routes;
pub use slots::{generate_slots, generate_slots_for, is_valid_slot, BusinessHours};
