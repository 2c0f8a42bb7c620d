use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use zipin::workflows::offer::{DealKey, DealMemory, DealRecord, RepositoryError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Newest-first deal memory bounded to `capacity` records.
#[derive(Clone)]
pub(crate) struct InMemoryDealMemory {
    capacity: usize,
    records: Arc<Mutex<VecDeque<DealRecord>>>,
}

impl InMemoryDealMemory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, VecDeque<DealRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("deal memory lock poisoned".to_string()))
    }
}

impl Default for InMemoryDealMemory {
    fn default() -> Self {
        Self::with_capacity(20)
    }
}

impl DealMemory for InMemoryDealMemory {
    fn save(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        guard.retain(|existing| existing.key != record.key);
        guard.push_front(record);
        guard.truncate(self.capacity);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Ok(self.guard()?.iter().cloned().collect())
    }

    fn fetch(&self, key: &DealKey) -> Result<Option<DealRecord>, RepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .find(|record| &record.key == key)
            .cloned())
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.guard()?.clear();
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
