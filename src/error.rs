//! Rejections raised at the series boundary.
//!
//! Short windows and zero variance are not errors; the indicator functions
//! report them in-band as NaN. Only input that would misrepresent a series if
//! silently repaired ends up here.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Malformed input detected while building a [`crate::series::Series`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// Symbol string is empty.
    #[error("series symbol must not be empty")]
    EmptySymbol,

    /// A point belonging to another symbol was passed in.
    #[error("series for {expected} received a point for {found}")]
    SymbolMismatch {
        /// Symbol the series was built for.
        expected: String,
        /// Symbol found on the offending point.
        found: String,
    },

    /// Price is NaN or infinite.
    #[error("{symbol}: non-finite price at {timestamp}")]
    NonFinitePrice {
        /// Series symbol.
        symbol: String,
        /// Timestamp of the offending point.
        timestamp: DateTime<Utc>,
    },

    /// Two points share the same timestamp.
    #[error("{symbol}: duplicate timestamp {timestamp}")]
    DuplicateTimestamp {
        /// Series symbol.
        symbol: String,
        /// The repeated timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Timestamps are not ascending.
    #[error("{symbol}: timestamp {current} precedes {previous}")]
    OutOfOrder {
        /// Series symbol.
        symbol: String,
        /// Timestamp of the earlier point in the sequence.
        previous: DateTime<Utc>,
        /// Timestamp that went backwards.
        current: DateTime<Utc>,
    },
}
