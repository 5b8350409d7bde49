use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::{Room, SeatMap};

/// A screening of one movie in one room, with its own seat state.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub movie_id: i64,
    pub room: Room,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub seats: SeatMap,
}

// sessions JOIN rooms
#[derive(Debug, FromRow)]
pub struct SessionRow {
    pub id: i64,
    pub movie_id: i64,
    pub room_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub capacity: i32,
    pub layout: String,
}

impl SessionRow {
    pub fn into_session(self, seats: SeatMap) -> Session {
        Session {
            id: self.id,
            movie_id: self.movie_id,
            room: Room { id: self.room_id, capacity: self.capacity, layout: self.layout },
            start_date: self.start_date,
            end_date: self.end_date,
            seats,
        }
    }
}
