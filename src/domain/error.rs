//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid game data.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("game document has an empty gameName")]
    EmptyGameName,

    #[error("inverted range {start}-{end} in sunburst tier {tier} of {game}")]
    InvertedRange {
        game: String,
        tier: usize,
        start: i64,
        end: i64,
    },

    #[error("invalid color {value:?} for {field}")]
    InvalidColor { field: &'static str, value: String },
}
