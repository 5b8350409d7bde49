pub mod eligibility;
pub mod reservation;
pub mod seat_selection;

pub use reservation::ReservationEngine;
