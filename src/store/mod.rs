//! Data-store contract consumed by the reservation engine.
//!
//! A booking runs inside one [`ReservationTx`]. The transaction holds an
//! exclusive lock on the session it read through [`ReservationTx::lock_session`],
//! so the availability check and the sold-flag write cannot interleave with
//! another booking of the same session. Dropping a transaction without
//! calling [`ReservationTx::commit`] discards all of its writes.

pub mod memory;
pub mod postgres;

use std::future::Future;

use crate::error::StoreError;
use crate::models::{Movie, NewTicket, Session, Ticket, TicketConfirmation, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

pub trait ReservationStore: Send + Sync {
    type Tx: ReservationTx;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;

    /// Non-locking read of a session with its room and seats.
    fn find_session(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Non-locking read used to authenticate callers.
    fn find_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    fn tickets_for_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<TicketConfirmation>, StoreError>> + Send;
}

pub trait ReservationTx: Send {
    /// Reads the session and locks it until commit or drop.
    fn lock_session(
        &mut self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    fn find_movie(
        &mut self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Movie>, StoreError>> + Send;

    fn find_user(
        &mut self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Writes the sold flag of every ticket's seat and inserts the tickets.
    ///
    /// A seat that is already sold in storage is reported as
    /// [`StoreError::Conflict`].
    fn save_tickets(
        &mut self,
        tickets: Vec<NewTicket>,
    ) -> impl Future<Output = Result<Vec<Ticket>, StoreError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
