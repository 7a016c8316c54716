use core_text::{Location, LocationRange};
use thiserror::Error;

/// Contract violations surfaced before any buffer mutation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("cursor position {location} is outside the buffer ({line_count} lines)")]
    InvalidCursorPosition {
        location: Location,
        line_count: usize,
    },
    #[error("range {range} is outside the buffer ({line_count} lines)")]
    InvalidRange {
        range: LocationRange,
        line_count: usize,
    },
    #[error("line span {start}..{end} is outside the buffer ({line_count} lines)")]
    InvalidLineSpan {
        start: usize,
        end: usize,
        line_count: usize,
    },
}
