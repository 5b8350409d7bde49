pub mod reservations;
pub mod sessions;

use axum::Router;
use std::sync::Arc;

use crate::store::ReservationStore;
use crate::AppState;

pub fn routes<S: ReservationStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .merge(reservations::routes())
        .merge(sessions::routes())
}
