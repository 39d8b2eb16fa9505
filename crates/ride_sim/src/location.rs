//! Grid locations and the Manhattan metric used for every travel estimate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when reading a location from its `row,col` text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationParseError {
    #[error("expected `row,col`, got {0:?}")]
    Shape(String),
    #[error("invalid coordinate {token:?} in {text:?}")]
    Coordinate { text: String, token: String },
}

/// A point on the city grid. Equality is componentwise; locations are not ordered.
///
/// Serializes (with serde and `Display`) as the literal text `row,col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location {
    row: i64,
    col: i64,
}

impl Location {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    pub fn row(&self) -> i64 {
        self.row
    }

    pub fn col(&self) -> i64 {
        self.col
    }

    /// Manhattan distance to `other`.
    pub fn distance_to(&self, other: Location) -> u64 {
        manhattan_distance(*self, other)
    }
}

/// `|a.row - b.row| + |a.col - b.col|`, saturating at `u64::MAX`. Zero iff `a == b`.
pub fn manhattan_distance(a: Location, b: Location) -> u64 {
    a.row.abs_diff(b.row).saturating_add(a.col.abs_diff(b.col))
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Location {
    type Err = LocationParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = text.split(',').collect();
        let [row, col] = tokens.as_slice() else {
            return Err(LocationParseError::Shape(text.to_string()));
        };
        let parse = |token: &str| {
            token
                .trim()
                .parse::<i64>()
                .map_err(|_| LocationParseError::Coordinate {
                    text: text.to_string(),
                    token: token.to_string(),
                })
        };
        Ok(Location::new(parse(row)?, parse(col)?))
    }
}

impl TryFrom<String> for Location {
    type Error = LocationParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}
