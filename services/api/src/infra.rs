use chrono::{Local, NaiveDate};
use hiring_ai::workflows::positions::repository::creation_date;
use hiring_ai::workflows::positions::{
    NewPosition, Position, PositionId, PositionRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local position store. Ids are millisecond timestamps, bumped to stay unique.
#[derive(Clone)]
pub(crate) struct InMemoryPositionRepository {
    positions: Arc<Mutex<Vec<Position>>>,
    next_id: Arc<AtomicU64>,
    fallback_location: String,
    today: Option<NaiveDate>,
}

impl InMemoryPositionRepository {
    pub(crate) fn new(fallback_location: impl Into<String>) -> Self {
        let seed = u64::try_from(Local::now().timestamp_millis()).unwrap_or_default();
        Self {
            positions: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(seed)),
            fallback_location: fallback_location.into(),
            today: None,
        }
    }

    /// Pins the creation date stamped on committed positions.
    pub(crate) fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Loads positions in list order (newest first).
    pub(crate) fn with_positions(self, positions: Vec<Position>) -> Result<Self, RepositoryError> {
        for position in positions.into_iter().rev() {
            self.prepend(position)?;
        }
        Ok(self)
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Position>>, RepositoryError> {
        self.positions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("position store poisoned".to_string()))
    }
}

impl PositionRepository for InMemoryPositionRepository {
    fn commit(&self, mut position: NewPosition) -> Result<Position, RepositoryError> {
        if position.location.trim().is_empty() {
            position.location = self.fallback_location.clone();
        }
        let id = PositionId(self.next_id.fetch_add(1, Ordering::Relaxed).to_string());
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let committed = position.into_position(id, creation_date(today));
        self.prepend(committed.clone())?;
        Ok(committed)
    }

    fn prepend(&self, position: Position) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        if guard.iter().any(|existing| existing.id == position.id) {
            return Err(RepositoryError::Conflict(position.id));
        }
        guard.insert(0, position);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Position>, RepositoryError> {
        Ok(self.guard()?.clone())
    }

    fn fetch(&self, id: &PositionId) -> Result<Option<Position>, RepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .find(|position| &position.id == id)
            .cloned())
    }
}
