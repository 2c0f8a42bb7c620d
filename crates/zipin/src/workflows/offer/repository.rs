use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calculator::{OfferResult, OfferSnapshot};
use super::domain::{OfferInput, ScenarioBand};
use super::market::{DemandIndex, StabilityIndex};

const KEY_PREFIX_LIMIT: usize = 160;

/// Stable identity for a deal: the normalized address (or ZIP) plus the ZIP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealKey(pub String);

impl DealKey {
    pub fn derive(address: &str, zip: &str) -> Self {
        let address = address.trim().to_lowercase();
        let stem = if address.is_empty() {
            format!("zip:{zip}")
        } else {
            address
        };
        let prefix: String = stem.chars().take(KEY_PREFIX_LIMIT).collect();
        Self(format!("{prefix}|{zip}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DealKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted summary of one offer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub key: DealKey,
    pub address: String,
    pub zip: String,
    pub cash_net: f64,
    pub partnership_net: f64,
    pub band: ScenarioBand,
    pub lesi: StabilityIndex,
    pub bdi: DemandIndex,
    pub created_at: DateTime<Utc>,
    pub input: OfferInput,
    pub result: OfferSnapshot,
}

impl DealRecord {
    pub fn from_run(input: &OfferInput, result: &OfferResult, created_at: DateTime<Utc>) -> Self {
        let property = &input.property;
        Self {
            key: DealKey::derive(&property.address, &property.zip),
            address: property.address.clone(),
            zip: property.zip.clone(),
            cash_net: result.cash_net,
            partnership_net: result.partnership_net,
            band: result.band,
            lesi: result.market.lesi,
            bdi: result.market.bdi,
            created_at,
            input: input.clone(),
            result: result.snapshot(),
        }
    }

    pub fn leaning(&self) -> &'static str {
        if self.partnership_net > self.cash_net {
            "Upside"
        } else {
            "Certainty"
        }
    }
}

/// Bounded store of recent deals, newest first.
///
/// Saving an existing key replaces the record and moves it to the front; once the store
/// is full the oldest record is evicted.
pub trait DealMemory: Send + Sync {
    fn save(&self, record: DealRecord) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<DealRecord>, RepositoryError>;
    fn fetch(&self, key: &DealKey) -> Result<Option<DealRecord>, RepositoryError>;
    fn clear(&self) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("deal not found")]
    NotFound,
    #[error("deal memory unavailable: {0}")]
    Unavailable(String),
}
