use chrono::NaiveDate;

use super::domain::{NewPosition, Position, PositionId};

/// Storage abstraction for committed positions.
///
/// `list` returns positions newest first: committed positions are prepended.
pub trait PositionRepository: Send + Sync {
    /// Assigns identity and creation date, stores the position at the head of the list.
    fn commit(&self, position: NewPosition) -> Result<Position, RepositoryError>;
    fn prepend(&self, position: Position) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Position>, RepositoryError>;
    fn fetch(&self, id: &PositionId) -> Result<Option<Position>, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("position {0} already exists")]
    Conflict(PositionId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Creation dates are stored as `DD/MM/YYYY` text.
pub fn creation_date(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}
