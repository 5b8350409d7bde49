use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Seat;

/// Ticket waiting to be written; the seat already carries `sold = true`.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub session_id: i64,
    pub user_id: i64,
    pub seat: Seat,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub seat: Seat,
    pub created_at: NaiveDateTime,
}

/// What the client gets back for every booked seat.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TicketConfirmation {
    pub id: i64,
    pub session_id: i64,
    pub username: String,
    pub row_number: i32,
    pub seat_number: i32,
}

impl TicketConfirmation {
    pub fn from_ticket(ticket: &Ticket, username: &str) -> Self {
        TicketConfirmation {
            id: ticket.id,
            session_id: ticket.session_id,
            username: username.to_string(),
            row_number: ticket.seat.row_number,
            seat_number: ticket.seat.seat_number,
        }
    }
}
