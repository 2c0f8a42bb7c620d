use super::super::calculator::OfferResult;
use super::super::config::OfferDefaults;
use super::super::domain::{
    ConditionSelections, FrictionSelections, OfferAssumptions, OfferInput, PropertyProfile,
    PropertyType, ScenarioBand, TimelineUrgency,
};
use super::super::normalizer::OfferForm;
use super::super::repository::{DealKey, DealMemory, DealRecord, RepositoryError};
use super::super::service::OfferService;
use crate::workflows::comps::ComparableSale;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub(super) const CENTS: f64 = 0.01;

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (±{tolerance}), got {actual}"
    );
}

/// Turnkey single-family in 55408 with every selection at its default.
pub(super) fn baseline_input() -> OfferInput {
    OfferInput {
        property: PropertyProfile {
            address: String::new(),
            zip: "55408".to_string(),
            property_type: PropertyType::SingleFamily,
            year_built: 1995,
            beds: 3,
            baths: 2.0,
            sqft: 1600,
            as_is_value: 300_000.0,
        },
        condition: ConditionSelections::default(),
        friction: FrictionSelections::default(),
        timeline: TimelineUrgency::Normal,
        band: ScenarioBand::Likely,
        signal: None,
        assumptions: OfferAssumptions::default(),
    }
}

pub(super) fn baseline_form() -> OfferForm {
    OfferForm {
        address: "4112 Bryant Ave S, Minneapolis, MN 55408".to_string(),
        as_is: "$300,000".to_string(),
        sqft: "1600".to_string(),
        year_built: "1995".to_string(),
        ..OfferForm::default()
    }
}

pub(super) fn comps() -> Vec<ComparableSale> {
    vec![
        ComparableSale {
            address: "4020 Colfax Ave S".to_string(),
            price: 310_000.0,
            area_sqft: 1550.0,
            distance_miles: 0.3,
            sale_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            note: String::new(),
        },
        ComparableSale {
            address: "3944 Aldrich Ave S".to_string(),
            price: 298_000.0,
            area_sqft: 1620.0,
            distance_miles: 0.6,
            sale_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            note: "needs paint".to_string(),
        },
    ]
}

pub(super) fn comps_as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn build_service() -> (OfferService<MemoryDeals>, Arc<MemoryDeals>) {
    let memory = Arc::new(MemoryDeals::default());
    let service = OfferService::new(memory.clone(), OfferDefaults::default());
    (service, memory)
}

pub(super) fn stored_record(input: &OfferInput, result: &OfferResult) -> DealRecord {
    DealRecord::from_run(input, result, chrono::Utc::now())
}

#[derive(Default, Clone)]
pub(super) struct MemoryDeals {
    pub(super) records: Arc<Mutex<Vec<DealRecord>>>,
}

impl MemoryDeals {
    pub(super) fn list_len(&self) -> usize {
        self.records.lock().expect("deal mutex poisoned").len()
    }
}

impl DealMemory for MemoryDeals {
    fn save(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("deal mutex poisoned");
        guard.retain(|existing| existing.key != record.key);
        guard.insert(0, record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Ok(self.records.lock().expect("deal mutex poisoned").clone())
    }

    fn fetch(&self, key: &DealKey) -> Result<Option<DealRecord>, RepositoryError> {
        let guard = self.records.lock().expect("deal mutex poisoned");
        Ok(guard.iter().find(|record| &record.key == key).cloned())
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.records.lock().expect("deal mutex poisoned").clear();
        Ok(())
    }
}

pub(super) struct UnavailableDeals;

impl DealMemory for UnavailableDeals {
    fn save(&self, _record: DealRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn list(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn fetch(&self, _key: &DealKey) -> Result<Option<DealRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
