use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::calculator::{OfferEngine, OfferResult};
use super::config::OfferDefaults;
use super::domain::{HyperlocalSignal, OfferInput, ValidationError};
use super::normalizer::{parse_selection, OfferForm};
use super::repository::{DealKey, DealMemory, DealRecord, RepositoryError};
use super::signals::{SignalSource, SyntheticSignalGenerator};
use crate::workflows::comps::{aggregate, ComparableSale, CompsContext, CompsStats};

/// One offer run: the intake form plus optional comps and a signal scan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub form: OfferForm,
    pub comps: Vec<ComparableSale>,
    pub comps_as_of: Option<NaiveDate>,
    /// Attach a synthetic hyperlocal signal when the form carries none.
    pub scan_signals: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub deal_key: DealKey,
    pub input: OfferInput,
    pub result: OfferResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comps: Option<CompsStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompsRequest {
    pub comps: Vec<ComparableSale>,
    pub subject_sqft: f64,
    pub band: String,
    pub as_of: Option<NaiveDate>,
    pub partnership_net: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignalScanRequest {
    pub address: String,
    pub zip: String,
}

/// Composes the normalizer, engine, comps aggregator, and deal memory.
pub struct OfferService<M> {
    memory: Arc<M>,
    signals: Arc<dyn SignalSource>,
    engine: OfferEngine,
    defaults: OfferDefaults,
}

impl<M> OfferService<M>
where
    M: DealMemory + 'static,
{
    pub fn new(memory: Arc<M>, defaults: OfferDefaults) -> Self {
        Self {
            memory,
            signals: Arc::new(SyntheticSignalGenerator),
            engine: OfferEngine::new(),
            defaults,
        }
    }

    pub fn with_signal_source(mut self, signals: Arc<dyn SignalSource>) -> Self {
        self.signals = signals;
        self
    }

    pub fn defaults(&self) -> &OfferDefaults {
        &self.defaults
    }

    /// Normalize, value, and remember a deal.
    ///
    /// Comps (when supplied) are aggregated twice: first to fill a missing as-is value,
    /// then again anchored on the resulting partnership net.
    pub fn quote(&self, request: QuoteRequest) -> Result<Quote, OfferServiceError> {
        let QuoteRequest {
            mut form,
            comps,
            comps_as_of,
            scan_signals,
        } = request;

        if scan_signals && form.signal.is_none() {
            form.signal = self.signals.scan(&form.address, &form.resolved_zip());
        }

        let as_of = comps_as_of.unwrap_or_else(|| Utc::now().date_naive());
        let mut context = CompsContext {
            subject_area: f64::from(form.subject_sqft()),
            band: form.band(&self.defaults),
            as_of,
            partnership_anchor: None,
        };
        let unanchored = aggregate(&comps, &context);

        let input = form.normalize_with_as_is_fallback(
            &self.defaults,
            unanchored.as_ref().map(|stats| stats.subject_suggested_value),
        );
        let result = self.engine.evaluate(&input)?;

        let comps_stats = unanchored.and_then(|_| {
            context.partnership_anchor = Some(result.partnership_net);
            aggregate(&comps, &context)
        });

        let record = DealRecord::from_run(&input, &result, Utc::now());
        let deal_key = record.key.clone();
        self.memory.save(record)?;

        info!(
            deal = %deal_key,
            band = input.band.label(),
            recommendation = result.recommendation.headline(),
            cash_net = result.cash_net,
            partnership_net = result.partnership_net,
            comps_used = comps_stats.as_ref().map_or(0, |stats| stats.comps_used),
            "offer quoted"
        );

        Ok(Quote {
            deal_key,
            input,
            result,
            comps: comps_stats,
        })
    }

    pub fn evaluate_comps(&self, request: &CompsRequest) -> Option<CompsStats> {
        let context = CompsContext {
            subject_area: request.subject_sqft.max(0.0),
            band: parse_selection(&request.band, self.defaults.band),
            as_of: request.as_of.unwrap_or_else(|| Utc::now().date_naive()),
            partnership_anchor: request.partnership_net,
        };
        let stats = aggregate(&request.comps, &context);
        debug!(
            submitted = request.comps.len(),
            used = stats.as_ref().map_or(0, |stats| stats.comps_used),
            "comps aggregated"
        );
        stats
    }

    pub fn scan_signals(&self, request: &SignalScanRequest) -> Option<HyperlocalSignal> {
        self.signals.scan(&request.address, &request.zip)
    }

    pub fn recent_deals(&self) -> Result<Vec<DealRecord>, OfferServiceError> {
        Ok(self.memory.list()?)
    }

    pub fn deal(&self, key: &DealKey) -> Result<DealRecord, OfferServiceError> {
        let record = self.memory.fetch(key)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn clear_deals(&self) -> Result<(), OfferServiceError> {
        self.memory.clear()?;
        info!("deal memory cleared");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OfferServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
