use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::debug;

use crate::database::Database;
use crate::error::StoreError;
use crate::models::{Movie, NewTicket, Seat, SeatMap, Session, SessionRow, Ticket, TicketConfirmation, User};
use crate::store::{ReservationStore, ReservationTx};

const SESSION_SQL: &str = r#"
    SELECT s.id, s.movie_id, s.room_id, s.start_date, s.end_date, r.capacity, r.layout
    FROM sessions s
    JOIN rooms r ON r.id = s.room_id
    WHERE s.id = $1
"#;

// Row lock on the session serializes bookings of the same screening.
const SESSION_FOR_UPDATE_SQL: &str = r#"
    SELECT s.id, s.movie_id, s.room_id, s.start_date, s.end_date, r.capacity, r.layout
    FROM sessions s
    JOIN rooms r ON r.id = s.room_id
    WHERE s.id = $1
    FOR UPDATE OF s
"#;

const USER_SQL: &str =
    "SELECT id, username, password_hash, birth_date, role FROM users WHERE username = $1";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(db: &Database) -> Self {
        PgStore { pool: db.pool.clone() }
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

async fn load_session(
    conn: &mut PgConnection,
    id: i64,
    for_update: bool,
) -> Result<Option<Session>, sqlx::Error> {
    let sql = if for_update { SESSION_FOR_UPDATE_SQL } else { SESSION_SQL };
    let Some(row) = sqlx::query_as::<_, SessionRow>(sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let seats = sqlx::query_as::<_, Seat>(
        "SELECT id, row_number, seat_number, sold
         FROM seats
         WHERE session_id = $1
         ORDER BY row_number, seat_number"
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(row.into_session(SeatMap::from_seats(seats))))
}

impl ReservationStore for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx })
    }

    async fn find_session(&self, id: i64) -> Result<Option<Session>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_session(&mut conn, id, false).await?)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(USER_SQL)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn tickets_for_user(&self, username: &str) -> Result<Vec<TicketConfirmation>, StoreError> {
        let tickets = sqlx::query_as::<_, TicketConfirmation>(
            r#"
            SELECT t.id, t.session_id, u.username, st.row_number, st.seat_number
            FROM tickets t
            JOIN users u ON u.id = t.user_id
            JOIN seats st ON st.id = t.seat_id
            WHERE u.username = $1
            ORDER BY t.id
            "#
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }
}

impl ReservationTx for PgTx {
    async fn lock_session(&mut self, id: i64) -> Result<Option<Session>, StoreError> {
        Ok(load_session(&mut self.tx, id, true).await?)
    }

    async fn find_movie(&mut self, id: i64) -> Result<Option<Movie>, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, category, length, description, age_limit FROM movies WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(movie)
    }

    async fn find_user(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(USER_SQL)
            .bind(username)
            .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    async fn save_tickets(&mut self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, StoreError> {
        let mut saved = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let updated = sqlx::query(
                "UPDATE seats SET sold = TRUE
                 WHERE id = $1 AND session_id = $2 AND sold = FALSE"
            )
            .bind(ticket.seat.id)
            .bind(ticket.session_id)
            .execute(&mut *self.tx)
            .await?;

            if updated.rows_affected() != 1 {
                return Err(StoreError::Conflict(format!(
                    "seat {} of session {} is no longer free",
                    ticket.seat.key(),
                    ticket.session_id
                )));
            }

            let (id, created_at): (i64, NaiveDateTime) = sqlx::query_as(
                "INSERT INTO tickets (session_id, user_id, seat_id)
                 VALUES ($1, $2, $3)
                 RETURNING id, created_at"
            )
            .bind(ticket.session_id)
            .bind(ticket.user_id)
            .bind(ticket.seat.id)
            .fetch_one(&mut *self.tx)
            .await?;

            debug!("inserted ticket {} for seat {}", id, ticket.seat.key());
            saved.push(Ticket {
                id,
                session_id: ticket.session_id,
                user_id: ticket.user_id,
                seat: ticket.seat,
                created_at,
            });
        }
        Ok(saved)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
