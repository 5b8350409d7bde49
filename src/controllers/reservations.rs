use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::middleware::AuthUser;
use crate::models::{ReservationRequest, Role};
use crate::store::ReservationStore;
use crate::AppState;

pub fn routes<S: ReservationStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/reservation", post(make_reservation::<S>))
        .route("/mytickets", get(my_tickets::<S>))
}

// POST /api/reservation
async fn make_reservation<S: ReservationStore>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<ReservationRequest>,
) -> Result<impl IntoResponse, Response> {
    user.require_role(Role::Client).map_err(IntoResponse::into_response)?;

    let tickets = state
        .engine
        .make_reservation(&req, &user.username)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok((StatusCode::CREATED, Json(tickets)))
}

// GET /api/mytickets
async fn my_tickets<S: ReservationStore>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, Response> {
    user.require_role(Role::Client).map_err(IntoResponse::into_response)?;

    let tickets = state
        .engine
        .tickets_for(&user.username)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok((StatusCode::OK, Json(tickets)))
}
