use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::ReservationError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub capacity: i32,
    /// Comma-separated seat count per row, row 1 first. E.g. "5,5,5".
    pub layout: String,
}

impl Room {
    pub fn parse_layout(&self) -> Result<RoomLayout, ReservationError> {
        self.layout.parse()
    }
}

/// Decoded room layout: one positive seat count per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLayout {
    rows: Vec<i32>,
}

impl RoomLayout {
    pub fn parse(layout: &str) -> Result<Self, ReservationError> {
        let rows = layout
            .split(',')
            .map(|token| match token.trim().parse::<i32>() {
                Ok(count) if count > 0 => Ok(count),
                _ => Err(ReservationError::InvalidLayoutFormat {
                    layout: layout.to_string(),
                    token: token.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RoomLayout { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Seat count of a 1-based row, `None` when the row does not exist.
    pub fn seats_in_row(&self, row: i32) -> Option<i32> {
        if row < 1 {
            return None;
        }
        self.rows.get((row - 1) as usize).copied()
    }

    pub fn row_counts(&self) -> &[i32] {
        &self.rows
    }

    pub fn total_seats(&self) -> i32 {
        self.rows.iter().sum()
    }
}

impl FromStr for RoomLayout {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomLayout::parse(s)
    }
}

impl fmt::Display for RoomLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, count) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", count)?;
        }
        Ok(())
    }
}
