use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::ReservationError;
use crate::models::SeatMap;
use crate::store::ReservationStore;
use crate::AppState;

pub fn routes<S: ReservationStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/session/{id}/seats", get(get_seat_map::<S>))
}

// GET /api/session/{id}/seats
async fn get_seat_map<S: ReservationStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(session_id): Path<i64>,
) -> Result<Json<SeatMap>, ReservationError> {
    let seats = state.engine.seat_map(session_id).await?;
    Ok(Json(seats))
}
