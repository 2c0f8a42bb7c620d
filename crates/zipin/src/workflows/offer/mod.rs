//! Cash versus partnership offer valuation.
//!
//! The pipeline runs leaves first: the normalizer turns a loosely typed [`OfferForm`] into an
//! [`OfferInput`]; the market resolver, condition cost model, and friction adjuster each
//! contribute independently; the scenario band scales their intermediate terms; and the
//! calculator composes everything into an [`OfferResult`]. Each evaluation is a pure
//! function of its input. Persistence, letters, and signal lookups sit behind traits so
//! callers decide where they live.

pub mod band;
pub mod calculator;
pub mod condition;
pub mod config;
pub mod domain;
pub mod friction;
pub mod letter;
pub mod market;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod service;
pub mod signals;

#[cfg(test)]
mod tests;

pub use band::BandProfile;
pub use calculator::{OfferBreakdown, OfferEngine, OfferResult, OfferSnapshot, Recommendation};
pub use condition::{ConditionPreset, RepairCategory, RepairEstimate};
pub use config::OfferDefaults;
pub use domain::{
    ConditionSelections, FrictionSelections, HyperlocalSignal, OfferAssumptions, OfferInput,
    PropertyProfile, PropertyType, ScenarioBand, Selection, TimelineUrgency, ValidationError,
};
pub use letter::{format_currency, LetterError, OfferLetterRenderer, OfferLetterTerms, PlainTextLetter};
pub use market::{resolve_market_bucket, MarketBucket};
pub use normalizer::OfferForm;
pub use repository::{DealKey, DealMemory, DealRecord, RepositoryError};
pub use router::offer_router;
pub use service::{
    CompsRequest, OfferService, OfferServiceError, Quote, QuoteRequest, SignalScanRequest,
};
pub use signals::{SignalSource, SyntheticSignalGenerator};
