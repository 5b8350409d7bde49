use serde::{Deserialize, Serialize};

use crate::models::SeatKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedSeat {
    pub row: i32,
    pub number: i32,
}

impl RequestedSeat {
    pub fn new(row: i32, number: i32) -> Self {
        RequestedSeat { row, number }
    }

    pub fn key(&self) -> SeatKey {
        SeatKey::new(self.row, self.number)
    }
}

/// Booking request body. The caller's identity travels separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub session_id: i64,
    #[serde(default)]
    pub seats: Vec<RequestedSeat>,
}

impl ReservationRequest {
    pub fn new(session_id: i64, seats: impl IntoIterator<Item = (i32, i32)>) -> Self {
        ReservationRequest {
            session_id,
            seats: seats
                .into_iter()
                .map(|(row, number)| RequestedSeat::new(row, number))
                .collect(),
        }
    }
}
