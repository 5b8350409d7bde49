#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

use cinema_reservations::models::Role;
use cinema_reservations::services::ReservationEngine;
use cinema_reservations::store::InMemoryStore;

pub const ADULT: &str = "filip.chmielewski@poczta.pl";
/// Turns 18 on 2024-06-02, the day after the screening.
pub const ALMOST_ADULT: &str = "ola.nowak@poczta.pl";
/// Turns 18 exactly on the screening date.
pub const JUST_ADULT: &str = "jan.kowalski@poczta.pl";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn screening_start() -> NaiveDateTime {
    date(2024, 6, 1).and_hms_opt(18, 30, 0).unwrap()
}

pub struct Cinema {
    pub store: InMemoryStore,
    pub engine: Arc<ReservationEngine<InMemoryStore>>,
    pub room_id: i64,
    pub movie_id: i64,
    pub session_id: i64,
}

/// One room with `layout`, one movie with `age_limit`, one screening and
/// three clients around the 18th birthday boundary.
pub async fn cinema(layout: &str, age_limit: i32) -> Cinema {
    let store = InMemoryStore::new();
    let room_id = store.insert_room(0, layout).await;
    let movie_id = store.insert_movie("Joker", 122, age_limit).await;
    store.insert_user(ADULT, date(1990, 3, 14), Role::Client).await;
    store.insert_user(ALMOST_ADULT, date(2006, 6, 2), Role::Client).await;
    store.insert_user(JUST_ADULT, date(2006, 6, 1), Role::Client).await;
    let session_id = store
        .create_session(movie_id, room_id, screening_start())
        .await
        .unwrap();

    Cinema {
        engine: Arc::new(ReservationEngine::new(store.clone())),
        store,
        room_id,
        movie_id,
        session_id,
    }
}
