use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use std::fmt;

/// Failure raised by a data-store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// A concurrent writer changed the row between our read and our write.
    #[error("write conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Which side of the room layout a requested seat fell off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutOfBounds {
    Row { row: i32, rows: usize },
    Seat { row: i32, seat: i32, seats: i32 },
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfBounds::Row { row, rows } => write!(f, "row {} out of {}", row, rows),
            OutOfBounds::Seat { row, seat, seats } => {
                write!(f, "seat {} out of {} in row {}", seat, seats, row)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("session {{id={0}}} was not found")]
    SessionNotFound(i64),
    #[error("movie {{id={0}}} was not found")]
    MovieNotFound(i64),
    #[error("room {{id={0}}} was not found")]
    RoomNotFound(i64),
    #[error("user {0} was not found")]
    UserNotFound(String),

    #[error("no seats were selected")]
    NoSeatsSelected,
    #[error("room layout {layout:?} is malformed; {token:?} is not a positive integer")]
    InvalidLayoutFormat { layout: String, token: String },
    #[error("reserved seat does not correspond to room layout; {0}")]
    SeatOutOfRoomBounds(OutOfBounds),
    #[error("reserved seats should be in the same row; expected row {expected}, got row {row}")]
    SeatsSpanMultipleRows { expected: i32, row: i32 },
    #[error("seat {seat} in row {row} was selected more than once")]
    DuplicateSeat { row: i32, seat: i32 },
    #[error("reserved seats should be next to each other; seats {first}..={last} cannot hold {count} seats")]
    SeatsNotAdjacent { first: i32, last: i32, count: usize },
    #[error("seat {seat} in row {row} does not exist in this session")]
    SeatNotFound { row: i32, seat: i32 },
    #[error("seat {seat} in row {row} is reserved")]
    SeatAlreadyReserved { row: i32, seat: i32 },
    #[error("the user does not meet the age requirements; age limit {age_limit}, eligible from {eligible_from}")]
    AgeRequirementNotMet {
        age_limit: i32,
        eligible_from: NaiveDate,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Internal,
}

impl ReservationError {
    pub fn kind(&self) -> ErrorKind {
        use ReservationError::*;
        match self {
            SessionNotFound(_) | MovieNotFound(_) | RoomNotFound(_) | UserNotFound(_) => {
                ErrorKind::NotFound
            }
            Store(_) => ErrorKind::Internal,
            NoSeatsSelected
            | InvalidLayoutFormat { .. }
            | SeatOutOfRoomBounds(_)
            | SeatsSpanMultipleRows { .. }
            | DuplicateSeat { .. }
            | SeatsNotAdjacent { .. }
            | SeatNotFound { .. }
            | SeatAlreadyReserved { .. }
            | AgeRequirementNotMet { .. } => ErrorKind::BadRequest,
        }
    }

    /// Stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        use ReservationError::*;
        match self {
            SessionNotFound(_) => "SESSION_NOT_FOUND",
            MovieNotFound(_) => "MOVIE_NOT_FOUND",
            RoomNotFound(_) => "ROOM_NOT_FOUND",
            UserNotFound(_) => "USER_NOT_FOUND",
            NoSeatsSelected => "NO_SEATS_SELECTED",
            InvalidLayoutFormat { .. } => "INVALID_LAYOUT_FORMAT",
            SeatOutOfRoomBounds(_) => "SEAT_OUT_OF_ROOM_BOUNDS",
            SeatsSpanMultipleRows { .. } => "SEATS_SPAN_MULTIPLE_ROWS",
            DuplicateSeat { .. } => "DUPLICATE_SEAT",
            SeatsNotAdjacent { .. } => "SEATS_NOT_ADJACENT",
            SeatNotFound { .. } => "SEAT_NOT_FOUND",
            SeatAlreadyReserved { .. } => "SEAT_ALREADY_RESERVED",
            AgeRequirementNotMet { .. } => "AGE_REQUIREMENT_NOT_MET",
            Store(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self.kind() {
            ErrorKind::Internal => {
                tracing::error!("reservation store failure: {:?}", self);
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let body = serde_json::json!({
            "error": self.code(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}
