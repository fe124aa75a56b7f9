//! Typed form of the resource locators the provider routes on.
//!
//! Two patterns exist:
//!
//! * `content://org.jokeview.provider/joke_table/record[/{id}]` for point
//!   operations on one joke (insert may leave the id out),
//! * `content://org.jokeview.provider/joke_table/filter/{code}` for filtered
//!   reads, where `code` is the integer encoding of a [`RatingFilter`].

use std::fmt;
use std::str::FromStr;

use crate::models::RatingFilter;

use super::error::ProviderError;

pub const AUTHORITY: &str = "org.jokeview.provider";
pub const BASE_PATH: &str = "joke_table";

const SCHEME: &str = "content://";
const RECORD_SEGMENT: &str = "record";
const FILTER_SEGMENT: &str = "filter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A single joke. `None` is only meaningful for inserts.
    Record(Option<i64>),
    /// Every joke matching the filter.
    Filter(RatingFilter),
}

impl Locator {
    pub fn record(id: i64) -> Self {
        Locator::Record(Some(id))
    }

    /// Locator used to insert a new joke.
    pub fn new_record() -> Self {
        Locator::Record(None)
    }

    pub fn filter(filter: RatingFilter) -> Self {
        Locator::Filter(filter)
    }

    /// The id segment, when this locator points at a stored joke.
    pub fn record_id(&self) -> Option<i64> {
        match self {
            Locator::Record(id) => *id,
            Locator::Filter(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{AUTHORITY}/{BASE_PATH}/")?;
        match self {
            Locator::Record(Some(id)) => write!(f, "{RECORD_SEGMENT}/{id}"),
            Locator::Record(None) => write!(f, "{RECORD_SEGMENT}"),
            Locator::Filter(filter) => write!(f, "{FILTER_SEGMENT}/{}", filter.code()),
        }
    }
}

impl FromStr for Locator {
    type Err = ProviderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || ProviderError::UnknownResource(raw.to_string());

        let path = raw
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(AUTHORITY))
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_prefix(BASE_PATH))
            .ok_or_else(unknown)?;

        let segments: Vec<&str> = match path.strip_prefix('/') {
            Some(rest) => rest.split('/').collect(),
            None => return Err(unknown()),
        };

        match segments.as_slice() {
            [RECORD_SEGMENT] => Ok(Locator::Record(None)),
            [RECORD_SEGMENT, id] => parse_number(id)
                .map(|id| Locator::Record(Some(id)))
                .ok_or_else(unknown),
            [FILTER_SEGMENT, code] => parse_number(code)
                .and_then(RatingFilter::from_code)
                .map(Locator::Filter)
                .ok_or_else(unknown),
            _ => Err(unknown()),
        }
    }
}

/// Only plain decimal digits count, so `-1`, `+1` and empty segments are
/// rejected rather than coerced.
fn parse_number(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
