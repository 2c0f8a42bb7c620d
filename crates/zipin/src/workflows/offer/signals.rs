use super::domain::HyperlocalSignal;
use super::market::{shifted, string_hash};

/// Source of hyperlocal risk scores for an address or ZIP.
pub trait SignalSource: Send + Sync {
    /// Returns `None` when neither an address nor a ZIP is available to key the lookup.
    fn scan(&self, address: &str, zip: &str) -> Option<HyperlocalSignal>;
}

/// Deterministic stand-in for a real signal feed.
///
/// Scores are derived from the same rolling hash used for market buckets, keyed by the
/// ZIP when present and the address otherwise. Identical keys always yield identical
/// signals; no network access is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSignalGenerator;

impl SignalSource for SyntheticSignalGenerator {
    fn scan(&self, address: &str, zip: &str) -> Option<HyperlocalSignal> {
        let address = address.trim();
        let zip = zip.trim();
        let key = if zip.is_empty() { address } else { zip };
        if key.is_empty() {
            return None;
        }

        let h = string_hash(key);
        let fraction = |value: i64| value as f64 / 100.0;

        Some(HyperlocalSignal {
            crime_index: Some(fraction(h % 100)),
            school_index: Some(fraction(shifted(h, 1) % 70)),
            flood_risk: Some(fraction(shifted(h, 2) % 25)),
            wildfire_risk: Some(fraction(shifted(h, 3) % 30)),
            review_delta: Some(if h % 100 > 50 { 0.3 } else { -0.2 }),
        })
    }
}
