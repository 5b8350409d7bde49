use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

use crate::error::{ReservationError, StoreError};
use crate::models::{
    Movie, NewTicket, Role, Room, RoomLayout, Seat, SeatMap, Session, Ticket, TicketConfirmation,
    User,
};
use crate::store::{ReservationStore, ReservationTx};

#[derive(Debug, Clone, Default)]
struct Tables {
    rooms: HashMap<i64, Room>,
    movies: HashMap<i64, Movie>,
    users: HashMap<String, User>,
    sessions: HashMap<i64, Session>,
    tickets: Vec<Ticket>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local store. A transaction holds the store-wide lock from
/// `begin` until commit or drop and works on a private copy of the tables,
/// which gives serializable bookings and all-or-nothing writes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_ticket_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save_tickets` fail as if the database were down.
    pub fn fail_ticket_writes(&self, fail: bool) {
        self.fail_ticket_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn insert_room(&self, capacity: i32, layout: &str) -> i64 {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        tables.rooms.insert(id, Room { id, capacity, layout: layout.to_string() });
        id
    }

    pub async fn insert_movie(&self, title: &str, length: i32, age_limit: i32) -> i64 {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        tables.movies.insert(
            id,
            Movie {
                id,
                title: title.to_string(),
                category: None,
                length,
                description: None,
                age_limit,
            },
        );
        id
    }

    pub async fn insert_user(&self, username: &str, birth_date: NaiveDate, role: Role) -> i64 {
        self.insert_user_with_hash(username, "", birth_date, role).await
    }

    /// Adds a user who can log in with the password behind `password_hash`.
    pub async fn insert_user_with_hash(
        &self,
        username: &str,
        password_hash: &str,
        birth_date: NaiveDate,
        role: Role,
    ) -> i64 {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        tables.users.insert(
            username.to_string(),
            User {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                birth_date,
                role,
            },
        );
        id
    }

    /// Schedules a screening and snapshots the room layout into its own
    /// unsold seat map.
    pub async fn create_session(
        &self,
        movie_id: i64,
        room_id: i64,
        start_date: NaiveDateTime,
    ) -> Result<i64, ReservationError> {
        let mut tables = self.tables.lock().await;
        let room = tables
            .rooms
            .get(&room_id)
            .cloned()
            .ok_or(ReservationError::RoomNotFound(room_id))?;
        let length = tables
            .movies
            .get(&movie_id)
            .map(|movie| movie.length)
            .ok_or(ReservationError::MovieNotFound(movie_id))?;

        let layout = RoomLayout::parse(&room.layout)?;
        let mut seats = SeatMap::from_layout(&layout);
        for seat in seats.iter_mut() {
            seat.id = tables.next_id();
        }

        let id = tables.next_id();
        info!("session {} created in room {} with {} seats", id, room_id, seats.len());
        tables.sessions.insert(
            id,
            Session {
                id,
                movie_id,
                room,
                start_date,
                end_date: start_date + Duration::minutes(i64::from(length)),
                seats,
            },
        );
        Ok(id)
    }

    pub async fn seat(&self, session_id: i64, row: i32, number: i32) -> Option<Seat> {
        let tables = self.tables.lock().await;
        let session = tables.sessions.get(&session_id)?;
        session.seats.lookup(row, number).ok().cloned()
    }

    pub async fn ticket_count(&self) -> usize {
        self.tables.lock().await.tickets.len()
    }
}

pub struct InMemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_ticket_writes: Arc<AtomicBool>,
}

impl ReservationStore for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<InMemoryTx, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTx {
            guard,
            staged,
            fail_ticket_writes: self.fail_ticket_writes.clone(),
        })
    }

    async fn find_session(&self, id: i64) -> Result<Option<Session>, StoreError> {
        Ok(self.tables.lock().await.sessions.get(&id).cloned())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables.lock().await.users.get(username).cloned())
    }

    async fn tickets_for_user(&self, username: &str) -> Result<Vec<TicketConfirmation>, StoreError> {
        let tables = self.tables.lock().await;
        let Some(user) = tables.users.get(username) else {
            return Ok(Vec::new());
        };
        Ok(tables
            .tickets
            .iter()
            .filter(|ticket| ticket.user_id == user.id)
            .map(|ticket| TicketConfirmation::from_ticket(ticket, username))
            .collect())
    }
}

impl ReservationTx for InMemoryTx {
    async fn lock_session(&mut self, id: i64) -> Result<Option<Session>, StoreError> {
        Ok(self.staged.sessions.get(&id).cloned())
    }

    async fn find_movie(&mut self, id: i64) -> Result<Option<Movie>, StoreError> {
        Ok(self.staged.movies.get(&id).cloned())
    }

    async fn find_user(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.staged.users.get(username).cloned())
    }

    async fn save_tickets(&mut self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, StoreError> {
        if self.fail_ticket_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("ticket writes are disabled".to_string()));
        }

        let mut saved = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let key = ticket.seat.key();
            let session = self
                .staged
                .sessions
                .get_mut(&ticket.session_id)
                .ok_or_else(|| StoreError::Conflict(format!("session {} vanished", ticket.session_id)))?;
            let seat = session
                .seats
                .lookup_mut(key.row, key.number)
                .map_err(|e| StoreError::Conflict(e.to_string()))?;
            if seat.sold {
                return Err(StoreError::Conflict(format!(
                    "seat {} of session {} is no longer free",
                    key, ticket.session_id
                )));
            }
            seat.mark_sold();
            let seat = seat.clone();

            let id = self.staged.next_id();
            let stored = Ticket {
                id,
                session_id: ticket.session_id,
                user_id: ticket.user_id,
                seat,
                created_at: Utc::now().naive_utc(),
            };
            self.staged.tickets.push(stored.clone());
            saved.push(stored);
        }
        Ok(saved)
    }

    async fn commit(self) -> Result<(), StoreError> {
        let InMemoryTx { mut guard, staged, .. } = self;
        *guard = staged;
        Ok(())
    }
}
