//! Concurrent bookings against the same screening must never double-sell.

mod common;

use futures::future::join_all;
use std::collections::HashSet;

use common::{cinema, ADULT};
use cinema_reservations::error::ReservationError;
use cinema_reservations::models::ReservationRequest;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_seat_is_sold_exactly_once() {
    const REQUESTS: usize = 64;
    let c = cinema("1", 0).await;

    let handles = (0..REQUESTS).map(|_| {
        let engine = c.engine.clone();
        let request = ReservationRequest::new(c.session_id, [(1, 1)]);
        tokio::spawn(async move { engine.make_reservation(&request, ADULT).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let already_reserved = results
        .iter()
        .filter(|r| matches!(r, Err(ReservationError::SeatAlreadyReserved { row: 1, seat: 1 })))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(already_reserved, REQUESTS - 1);
    assert_eq!(c.store.ticket_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_selections_never_share_a_seat() {
    let c = cinema("10,10", 0).await;

    // Every window of two seats in row 1, each requested several times.
    let handles = (0..4).flat_map(|_| 1..10).map(|start| {
        let engine = c.engine.clone();
        let request = ReservationRequest::new(c.session_id, [(1, start), (1, start + 1)]);
        tokio::spawn(async move { engine.make_reservation(&request, ADULT).await })
    });
    let results = join_all(handles).await;

    let mut sold = HashSet::new();
    for result in results {
        match result.expect("task panicked") {
            Ok(tickets) => {
                assert_eq!(tickets.len(), 2);
                for ticket in tickets {
                    assert!(
                        sold.insert((ticket.row_number, ticket.seat_number)),
                        "seat {}x{} sold twice",
                        ticket.row_number,
                        ticket.seat_number
                    );
                }
            }
            Err(ReservationError::SeatAlreadyReserved { .. }) => {}
            Err(other) => panic!("unexpected {:?}", other),
        }
    }

    assert!(!sold.is_empty());
    assert_eq!(c.store.ticket_count().await, sold.len());
    let map = c.engine.seat_map(c.session_id).await.unwrap();
    assert_eq!(map.sold_count(), sold.len());
}
