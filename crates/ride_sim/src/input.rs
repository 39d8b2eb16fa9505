//! Event-list parsing.
//!
//! One event per line: `timestamp EventType args...`. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! # t  type           id     origin  destination  patience
//! 0    DriverRequest  Dan    0,0     1
//! 10   RiderRequest   Ann    4,2     1,5          15
//! ```

use std::num::NonZeroU64;

use thiserror::Error;

use crate::location::{Location, LocationParseError};

/// An input event before any entity exists for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEvent {
    RiderRequest {
        timestamp: u64,
        id: String,
        origin: Location,
        destination: Location,
        patience: u64,
    },
    DriverRequest {
        timestamp: u64,
        id: String,
        location: Location,
        speed: NonZeroU64,
    },
}

impl SeedEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            SeedEvent::RiderRequest { timestamp, .. } => *timestamp,
            SeedEvent::DriverRequest { timestamp, .. } => *timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("line {line}: missing {field}")]
    MissingToken { line: usize, field: &'static str },

    #[error("line {line}: {field} {token:?} is not a non-negative integer")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        token: String,
    },

    #[error("line {line}: driver speed must be positive")]
    ZeroSpeed { line: usize },

    #[error("line {line}: {source}")]
    Location {
        line: usize,
        #[source]
        source: LocationParseError,
    },

    #[error("line {line}: unknown event type {token:?}")]
    UnknownEventType { line: usize, token: String },

    #[error("line {line}: unexpected trailing token {token:?}")]
    TrailingToken { line: usize, token: String },
}

struct Tokens<'a> {
    line: usize,
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, field: &'static str) -> Result<&'a str, InputError> {
        self.inner.next().ok_or(InputError::MissingToken {
            line: self.line,
            field,
        })
    }

    fn number(&mut self, field: &'static str) -> Result<u64, InputError> {
        let token = self.next(field)?;
        token.parse().map_err(|_| InputError::InvalidNumber {
            line: self.line,
            field,
            token: token.to_string(),
        })
    }

    fn location(&mut self, field: &'static str) -> Result<Location, InputError> {
        let token = self.next(field)?;
        token.parse().map_err(|source| InputError::Location {
            line: self.line,
            source,
        })
    }

    fn finish(mut self) -> Result<(), InputError> {
        match self.inner.next() {
            Some(token) => Err(InputError::TrailingToken {
                line: self.line,
                token: token.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Parses one line. `line` is the 1-based line number used in errors.
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_event_line(line: usize, text: &str) -> Result<Option<SeedEvent>, InputError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = Tokens {
        line,
        inner: text.split_whitespace(),
    };
    let timestamp = tokens.number("timestamp")?;
    let event_type = tokens.next("event type")?;

    let event = match event_type {
        "RiderRequest" => SeedEvent::RiderRequest {
            timestamp,
            id: tokens.next("rider id")?.to_string(),
            origin: tokens.location("origin")?,
            destination: tokens.location("destination")?,
            patience: tokens.number("patience")?,
        },
        "DriverRequest" => {
            let id = tokens.next("driver id")?.to_string();
            let location = tokens.location("location")?;
            let speed = NonZeroU64::new(tokens.number("speed")?)
                .ok_or(InputError::ZeroSpeed { line })?;
            SeedEvent::DriverRequest {
                timestamp,
                id,
                location,
                speed,
            }
        }
        other => {
            return Err(InputError::UnknownEventType {
                line,
                token: other.to_string(),
            })
        }
    };
    tokens.finish()?;
    Ok(Some(event))
}

/// Parses a whole event list, stopping at the first malformed line.
pub fn parse_event_list(text: &str) -> Result<Vec<SeedEvent>, InputError> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| parse_event_line(index + 1, line).transpose())
        .collect()
}
