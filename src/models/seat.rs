use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ReservationError;
use crate::models::RoomLayout;

/// Position of a seat inside a room: 1-based row and seat number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatKey {
    pub row: i32,
    pub number: i32,
}

impl SeatKey {
    pub fn new(row: i32, number: i32) -> Self {
        SeatKey { row, number }
    }
}

// Rendered as "3x5" on the wire so the seat map serializes as a JSON object.
impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.row, self.number)
    }
}

impl FromStr for SeatKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, number) = s
            .split_once('x')
            .ok_or_else(|| format!("seat key {:?} is not in ROWxSEAT form", s))?;
        let row = row.parse().map_err(|_| format!("bad row in seat key {:?}", s))?;
        let number = number.parse().map_err(|_| format!("bad seat in seat key {:?}", s))?;
        Ok(SeatKey { row, number })
    }
}

impl Serialize for SeatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    #[serde(skip)]
    pub id: i64,
    pub row_number: i32,
    pub seat_number: i32,
    pub sold: bool,
}

impl Seat {
    pub fn key(&self) -> SeatKey {
        SeatKey::new(self.row_number, self.seat_number)
    }

    pub fn mark_sold(&mut self) {
        self.sold = true;
    }
}

/// A session's seats keyed by position. Each session owns its own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap(BTreeMap<SeatKey, Seat>);

impl SeatMap {
    /// Unsold snapshot of every seat the layout describes.
    pub fn from_layout(layout: &RoomLayout) -> Self {
        let mut seats = BTreeMap::new();
        for (index, count) in layout.row_counts().iter().enumerate() {
            let row = index as i32 + 1;
            for number in 1..=*count {
                seats.insert(
                    SeatKey::new(row, number),
                    Seat { id: 0, row_number: row, seat_number: number, sold: false },
                );
            }
        }
        SeatMap(seats)
    }

    pub fn from_seats(seats: impl IntoIterator<Item = Seat>) -> Self {
        SeatMap(seats.into_iter().map(|seat| (seat.key(), seat)).collect())
    }

    pub fn lookup(&self, row: i32, seat: i32) -> Result<&Seat, ReservationError> {
        self.0
            .get(&SeatKey::new(row, seat))
            .ok_or(ReservationError::SeatNotFound { row, seat })
    }

    pub fn lookup_mut(&mut self, row: i32, seat: i32) -> Result<&mut Seat, ReservationError> {
        self.0
            .get_mut(&SeatKey::new(row, seat))
            .ok_or(ReservationError::SeatNotFound { row, seat })
    }

    /// Flips the seat to sold. Callers must have checked availability first.
    pub fn mark_sold(&mut self, row: i32, seat: i32) -> Result<&Seat, ReservationError> {
        let seat = self.lookup_mut(row, seat)?;
        seat.mark_sold();
        Ok(seat)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seat> {
        self.0.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Seat> {
        self.0.values_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sold_count(&self) -> usize {
        self.0.values().filter(|seat| seat.sold).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_five() -> SeatMap {
        SeatMap::from_layout(&RoomLayout::parse("5,5,5").unwrap())
    }

    #[test]
    fn seat_key_text_form() {
        let key: SeatKey = "3x5".parse().unwrap();
        assert_eq!(key, SeatKey::new(3, 5));
        assert_eq!(key.to_string(), "3x5");
        assert!("35".parse::<SeatKey>().is_err());
        assert!("ax5".parse::<SeatKey>().is_err());
    }

    #[test]
    fn snapshot_covers_whole_layout_unsold() {
        let map = SeatMap::from_layout(&RoomLayout::parse("2,3").unwrap());
        assert_eq!(map.len(), 5);
        assert_eq!(map.sold_count(), 0);
        assert!(map.lookup(2, 3).is_ok());
        assert!(map.lookup(1, 3).is_err());
    }

    #[test]
    fn lookup_outside_session_is_seat_not_found() {
        let map = three_by_five();
        match map.lookup(4, 1) {
            Err(ReservationError::SeatNotFound { row: 4, seat: 1 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mark_sold_only_touches_one_seat() {
        let mut map = three_by_five();
        map.mark_sold(2, 3).unwrap();
        assert!(map.lookup(2, 3).unwrap().sold);
        assert!(!map.lookup(2, 4).unwrap().sold);
        assert_eq!(map.sold_count(), 1);
    }

    #[test]
    fn seat_map_serializes_with_text_keys() {
        let mut map = SeatMap::from_layout(&RoomLayout::parse("1,1").unwrap());
        map.mark_sold(2, 1).unwrap();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "1x1": {"row_number": 1, "seat_number": 1, "sold": false},
                "2x1": {"row_number": 2, "seat_number": 1, "sold": true},
            })
        );
        let back: SeatMap = serde_json::from_value(json).unwrap();
        assert_eq!(back.sold_count(), 1);
    }
}
