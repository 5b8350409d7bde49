//! Seat selection rules.
//!
//! Checks run in a fixed order and stop at the first violation:
//! layout bounds for every seat, then single row, then distinct and
//! contiguous seat numbers, then availability in the session.

use crate::error::{OutOfBounds, ReservationError};
use crate::models::{RequestedSeat, RoomLayout, SeatMap};

pub fn validate_selection(
    requested: &[RequestedSeat],
    layout: &RoomLayout,
    seats: &SeatMap,
) -> Result<(), ReservationError> {
    if requested.is_empty() {
        return Err(ReservationError::NoSeatsSelected);
    }
    check_room_bounds(requested, layout)?;
    let row = check_single_row(requested)?;
    check_adjacent(requested, row)?;
    check_available(requested, seats)
}

fn check_room_bounds(requested: &[RequestedSeat], layout: &RoomLayout) -> Result<(), ReservationError> {
    for seat in requested {
        let Some(seats_in_row) = layout.seats_in_row(seat.row) else {
            return Err(ReservationError::SeatOutOfRoomBounds(OutOfBounds::Row {
                row: seat.row,
                rows: layout.row_count(),
            }));
        };
        if seat.number < 1 || seat.number > seats_in_row {
            return Err(ReservationError::SeatOutOfRoomBounds(OutOfBounds::Seat {
                row: seat.row,
                seat: seat.number,
                seats: seats_in_row,
            }));
        }
    }
    Ok(())
}

fn check_single_row(requested: &[RequestedSeat]) -> Result<i32, ReservationError> {
    let expected = requested[0].row;
    match requested.iter().find(|seat| seat.row != expected) {
        Some(seat) => Err(ReservationError::SeatsSpanMultipleRows { expected, row: seat.row }),
        None => Ok(expected),
    }
}

fn check_adjacent(requested: &[RequestedSeat], row: i32) -> Result<(), ReservationError> {
    let mut numbers: Vec<i32> = requested.iter().map(|seat| seat.number).collect();
    numbers.sort_unstable();

    if let Some(pair) = numbers.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(ReservationError::DuplicateSeat { row, seat: pair[0] });
    }

    let first = numbers[0];
    let last = numbers[numbers.len() - 1];
    if (last - first) as usize != numbers.len() - 1 {
        return Err(ReservationError::SeatsNotAdjacent {
            first,
            last,
            count: numbers.len(),
        });
    }
    Ok(())
}

fn check_available(requested: &[RequestedSeat], seats: &SeatMap) -> Result<(), ReservationError> {
    for wanted in requested {
        let seat = seats.lookup(wanted.row, wanted.number)?;
        if seat.sold {
            return Err(ReservationError::SeatAlreadyReserved {
                row: wanted.row,
                seat: wanted.number,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(layout: &str) -> (RoomLayout, SeatMap) {
        let layout = RoomLayout::parse(layout).unwrap();
        let seats = SeatMap::from_layout(&layout);
        (layout, seats)
    }

    fn seats(list: &[(i32, i32)]) -> Vec<RequestedSeat> {
        list.iter().map(|&(row, number)| RequestedSeat::new(row, number)).collect()
    }

    #[test]
    fn accepts_contiguous_run_in_one_row() {
        let (layout, map) = room("5,5,5");
        assert!(validate_selection(&seats(&[(2, 3), (2, 4), (2, 5)]), &layout, &map).is_ok());
        assert!(validate_selection(&seats(&[(2, 5), (2, 3), (2, 4)]), &layout, &map).is_ok());
        assert!(validate_selection(&seats(&[(1, 1)]), &layout, &map).is_ok());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let (layout, map) = room("5");
        assert!(matches!(
            validate_selection(&[], &layout, &map),
            Err(ReservationError::NoSeatsSelected)
        ));
    }

    #[test]
    fn row_beyond_layout_is_out_of_bounds() {
        let (layout, map) = room("5,5,5,5,5");
        match validate_selection(&seats(&[(10, 1)]), &layout, &map) {
            Err(ReservationError::SeatOutOfRoomBounds(OutOfBounds::Row { row: 10, rows: 5 })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn seat_beyond_row_is_out_of_bounds() {
        let (layout, map) = room("5,3");
        match validate_selection(&seats(&[(2, 3), (2, 4)]), &layout, &map) {
            Err(ReservationError::SeatOutOfRoomBounds(OutOfBounds::Seat { row: 2, seat: 4, seats: 3 })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_positive_coordinates_are_out_of_bounds() {
        let (layout, map) = room("5,5");
        for bad in [(0, 1), (-1, 1), (1, 0), (1, -3)] {
            assert!(matches!(
                validate_selection(&seats(&[bad]), &layout, &map),
                Err(ReservationError::SeatOutOfRoomBounds(_))
            ));
        }
    }

    #[test]
    fn bounds_are_checked_for_every_seat_before_row_rule() {
        // Second seat is in another row and the third is off the layout:
        // the bounds failure wins.
        let (layout, map) = room("5,5");
        match validate_selection(&seats(&[(1, 1), (2, 1), (3, 1)]), &layout, &map) {
            Err(ReservationError::SeatOutOfRoomBounds(OutOfBounds::Row { row: 3, .. })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn seats_in_two_rows_are_rejected() {
        let (layout, map) = room("5,5,5");
        match validate_selection(&seats(&[(1, 1), (2, 1)]), &layout, &map) {
            Err(ReservationError::SeatsSpanMultipleRows { expected: 1, row: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn gap_in_selection_is_not_adjacent() {
        let (layout, map) = room("5,5,5");
        match validate_selection(&seats(&[(2, 3), (2, 5)]), &layout, &map) {
            Err(ReservationError::SeatsNotAdjacent { first: 3, last: 5, count: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn repeated_seat_is_rejected_even_when_span_matches() {
        // 3,3,5 spans exactly count - 1 but skips seat 4.
        let (layout, map) = room("5,5,5");
        match validate_selection(&seats(&[(2, 3), (2, 3), (2, 5)]), &layout, &map) {
            Err(ReservationError::DuplicateSeat { row: 2, seat: 3 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn sold_seat_is_already_reserved() {
        let (layout, mut map) = room("5,5,5");
        map.mark_sold(2, 4).unwrap();
        match validate_selection(&seats(&[(2, 3), (2, 4)]), &layout, &map) {
            Err(ReservationError::SeatAlreadyReserved { row: 2, seat: 4 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn adjacency_is_checked_before_availability() {
        let (layout, mut map) = room("5,5,5");
        map.mark_sold(2, 1).unwrap();
        assert!(matches!(
            validate_selection(&seats(&[(2, 1), (2, 3)]), &layout, &map),
            Err(ReservationError::SeatsNotAdjacent { .. })
        ));
    }

    #[test]
    fn seat_missing_from_session_map_is_seat_not_found() {
        let layout = RoomLayout::parse("5,5").unwrap();
        let map = SeatMap::from_layout(&RoomLayout::parse("5").unwrap());
        assert!(matches!(
            validate_selection(&seats(&[(2, 1)]), &layout, &map),
            Err(ReservationError::SeatNotFound { row: 2, seat: 1 })
        ));
    }
}
