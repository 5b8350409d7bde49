//! Reservation engine: the only writer of tickets and seat sold flags.
//!
//! A booking runs as a single store transaction:
//!
//! 1. lock the session (missing -> `SessionNotFound`)
//! 2. reject an empty selection
//! 3. run the seat selection rules against the room layout and seat map
//! 4. resolve the client and movie, check the age limit
//! 5. mark every requested seat sold and build one ticket per seat
//! 6. save the tickets and commit
//!
//! Any failure drops the transaction, so nothing is written.

use tracing::{info, warn};

use crate::error::{ErrorKind, ReservationError};
use crate::models::{NewTicket, ReservationRequest, SeatMap, TicketConfirmation, User};
use crate::services::{eligibility, seat_selection};
use crate::store::{ReservationStore, ReservationTx};

pub struct ReservationEngine<S> {
    store: S,
}

impl<S: ReservationStore> ReservationEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn make_reservation(
        &self,
        request: &ReservationRequest,
        username: &str,
    ) -> Result<Vec<TicketConfirmation>, ReservationError> {
        let result = self.book(request, username).await;
        // Store failures are logged where they become a response.
        if let Err(e) = &result {
            if e.kind() != ErrorKind::Internal {
                warn!(
                    "reservation for session {} by {} rejected: {}",
                    request.session_id, username, e
                );
            }
        }
        result
    }

    async fn book(
        &self,
        request: &ReservationRequest,
        username: &str,
    ) -> Result<Vec<TicketConfirmation>, ReservationError> {
        let mut tx = self.store.begin().await?;

        let mut session = tx
            .lock_session(request.session_id)
            .await?
            .ok_or(ReservationError::SessionNotFound(request.session_id))?;

        if request.seats.is_empty() {
            return Err(ReservationError::NoSeatsSelected);
        }

        let layout = session.room.parse_layout()?;
        seat_selection::validate_selection(&request.seats, &layout, &session.seats)?;

        let user = tx
            .find_user(username)
            .await?
            .ok_or_else(|| ReservationError::UserNotFound(username.to_string()))?;
        let movie = tx
            .find_movie(session.movie_id)
            .await?
            .ok_or(ReservationError::MovieNotFound(session.movie_id))?;
        eligibility::check_eligibility(user.birth_date, movie.age_limit, session.start_date.date())?;

        let mut tickets = Vec::with_capacity(request.seats.len());
        for wanted in &request.seats {
            let seat = session.seats.mark_sold(wanted.row, wanted.number)?;
            tickets.push(NewTicket {
                session_id: session.id,
                user_id: user.id,
                seat: seat.clone(),
            });
        }

        let saved = tx.save_tickets(tickets).await?;
        tx.commit().await?;

        for ticket in &saved {
            info!(
                "ticket {{id={}}} was added: session {} seat {} for {}",
                ticket.id,
                ticket.session_id,
                ticket.seat.key(),
                username
            );
        }

        Ok(saved
            .iter()
            .map(|ticket| TicketConfirmation::from_ticket(ticket, username))
            .collect())
    }

    pub async fn seat_map(&self, session_id: i64) -> Result<SeatMap, ReservationError> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(ReservationError::SessionNotFound(session_id))?;
        Ok(session.seats)
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>, ReservationError> {
        Ok(self.store.find_user(username).await?)
    }

    pub async fn tickets_for(&self, username: &str) -> Result<Vec<TicketConfirmation>, ReservationError> {
        Ok(self.store.tickets_for_user(username).await?)
    }
}
