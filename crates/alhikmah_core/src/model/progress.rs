//! Reading progress snapshot model.

use crate::model::book::BookId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned snapshot identifier.
pub type ProgressId = i64;

/// Immutable record of where a reader was at a point in time.
///
/// References its book by id only; rows survive book deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub id: ProgressId,
    pub book_id: BookId,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub page_number: u32,
    /// Completion in `0.0..=100.0`.
    pub percentage: f32,
    /// Always `0` today; session timing is not tracked.
    pub duration_seconds: u32,
}

impl ReadingProgress {
    pub fn new(
        book_id: BookId,
        page_number: u32,
        percentage: f32,
        duration_seconds: u32,
        timestamp: i64,
    ) -> Self {
        Self {
            id: 0,
            book_id,
            timestamp,
            page_number,
            percentage,
            duration_seconds,
        }
    }

    pub fn validate(&self) -> Result<(), ProgressValidationError> {
        if self.book_id <= 0 {
            return Err(ProgressValidationError::MissingBook(self.book_id));
        }
        if !self.percentage.is_finite() || !(0.0..=100.0).contains(&self.percentage) {
            return Err(ProgressValidationError::PercentageOutOfRange(self.percentage));
        }
        Ok(())
    }
}

/// Validation failures for [`ReadingProgress`] records.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressValidationError {
    MissingBook(BookId),
    PercentageOutOfRange(f32),
}

impl Display for ProgressValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBook(id) => write!(f, "progress must reference a stored book, got id {id}"),
            Self::PercentageOutOfRange(value) => {
                write!(f, "progress percentage {value} is outside 0..=100")
            }
        }
    }
}

impl Error for ProgressValidationError {}

/// `page / total_pages * 100`, or `0` while the page count is unknown.
pub fn completion_percentage(page: u32, total_pages: u32) -> f32 {
    if total_pages == 0 {
        return 0.0;
    }
    (page as f32 / total_pages as f32 * 100.0).min(100.0)
}
