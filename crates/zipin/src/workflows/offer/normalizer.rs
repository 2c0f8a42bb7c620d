//! Lenient intake: free-form form fields in, bounded engine input out.
//!
//! Nothing here fails. Malformed numbers fall back to documented defaults and unknown
//! selection codes fall back to the best option (or the chosen preset) with a warning.
//! ZIP and as-is validation is left to [`OfferEngine`](super::calculator::OfferEngine).

use super::condition::ConditionPreset;
use super::config::OfferDefaults;
use super::domain::{
    ConditionSelections, FrictionSelections, HyperlocalSignal, OfferAssumptions, OfferInput,
    PropertyProfile, PropertyType, ScenarioBand, Selection, TimelineUrgency,
};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;
use tracing::warn;

pub const DEFAULT_YEAR_BUILT: f64 = 1995.0;
pub const DEFAULT_BEDS: f64 = 3.0;
pub const DEFAULT_BATHS: f64 = 2.0;
pub const DEFAULT_SQFT: f64 = 1600.0;

/// Parses the longest numeric prefix after stripping everything but digits, `.` and `-`.
///
/// `"$300,000"` yields `300000.0`; more than one decimal point, or nothing numeric, yields
/// `default`.
pub fn lenient_number(raw: &str, default: f64) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    if cleaned.matches('.').count() > 1 {
        return default;
    }

    let bytes = cleaned.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return default;
    }

    match cleaned[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

static ADDRESS_ZIP_PATTERN: OnceLock<Regex> = OnceLock::new();
static STATE_AFTER_COMMA_PATTERN: OnceLock<Regex> = OnceLock::new();
static STATE_BEFORE_ZIP_PATTERN: OnceLock<Regex> = OnceLock::new();

pub fn parse_zip_from_address(address: &str) -> Option<String> {
    let pattern = ADDRESS_ZIP_PATTERN
        .get_or_init(|| Regex::new(r"\b[0-9]{5}(?:-[0-9]{4})?\b").expect("valid address zip pattern"));
    pattern.find(address).map(|found| found.as_str().to_string())
}

/// Two-letter state code preceding the ZIP, e.g. `, MN 55408` or ` MN55408`.
pub fn parse_state_from_address(address: &str) -> Option<String> {
    let after_comma = STATE_AFTER_COMMA_PATTERN.get_or_init(|| {
        Regex::new(r",[ \t]*([A-Za-z]{2})[ \t]+[0-9]{5}").expect("valid state pattern")
    });
    let before_zip = STATE_BEFORE_ZIP_PATTERN
        .get_or_init(|| Regex::new(r"[ \t]([A-Za-z]{2})[ \t]*[0-9]{5}").expect("valid state pattern"));

    after_comma
        .captures(address)
        .or_else(|| before_zip.captures(address))
        .and_then(|captures| captures.get(1))
        .map(|state| state.as_str().to_ascii_uppercase())
}

/// Blank codes take `fallback` silently; unknown codes take it with a warning.
pub fn parse_selection<T: Selection>(raw: &str, fallback: T) -> T {
    if raw.trim().is_empty() {
        return fallback;
    }
    T::from_code(raw).unwrap_or_else(|| {
        warn!(field = T::FIELD, value = raw, fallback = fallback.code(), "unknown selection code");
        fallback
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

/// Accepts strings, numbers, booleans, or null for a text field.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(match value {
        None => String::new(),
        Some(LooseValue::Text(text)) => text,
        Some(LooseValue::Number(number)) => number.to_string(),
        Some(LooseValue::Flag(flag)) => flag.to_string(),
    })
}

/// Raw intake form as typed by an operator; every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferForm {
    #[serde(deserialize_with = "lenient_text")]
    pub address: String,
    #[serde(deserialize_with = "lenient_text")]
    pub zip: String,
    #[serde(deserialize_with = "lenient_text")]
    pub property_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub year_built: String,
    #[serde(deserialize_with = "lenient_text")]
    pub beds: String,
    #[serde(deserialize_with = "lenient_text")]
    pub baths: String,
    #[serde(deserialize_with = "lenient_text")]
    pub sqft: String,
    #[serde(deserialize_with = "lenient_text")]
    pub as_is: String,

    #[serde(deserialize_with = "lenient_text")]
    pub preset: String,
    #[serde(deserialize_with = "lenient_text")]
    pub roof: String,
    #[serde(deserialize_with = "lenient_text")]
    pub exterior: String,
    #[serde(deserialize_with = "lenient_text")]
    pub foundation: String,
    #[serde(deserialize_with = "lenient_text")]
    pub basement: String,
    #[serde(deserialize_with = "lenient_text")]
    pub hvac: String,
    #[serde(deserialize_with = "lenient_text")]
    pub electrical: String,
    #[serde(deserialize_with = "lenient_text")]
    pub plumbing: String,
    #[serde(deserialize_with = "lenient_text")]
    pub windows: String,
    #[serde(deserialize_with = "lenient_text")]
    pub kitchen: String,
    #[serde(deserialize_with = "lenient_text")]
    pub bathrooms_to_redo: String,
    #[serde(deserialize_with = "lenient_text")]
    pub flooring: String,
    #[serde(deserialize_with = "lenient_text")]
    pub hazards: String,

    #[serde(deserialize_with = "lenient_text")]
    pub hoa: String,
    #[serde(deserialize_with = "lenient_text")]
    pub occupancy: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub access: String,

    #[serde(deserialize_with = "lenient_text")]
    pub timeline: String,
    #[serde(deserialize_with = "lenient_text")]
    pub band: String,

    #[serde(deserialize_with = "lenient_text")]
    pub profit_split: String,
    #[serde(deserialize_with = "lenient_text")]
    pub service_rate_base: String,
    #[serde(deserialize_with = "lenient_text")]
    pub cash_discount_base: String,
    #[serde(deserialize_with = "lenient_text")]
    pub carry_per_day: String,

    pub signal: Option<HyperlocalSignal>,
}

impl OfferForm {
    pub fn normalize(&self, defaults: &OfferDefaults) -> OfferInput {
        self.normalize_with_as_is_fallback(defaults, None)
    }

    /// Like [`normalize`](Self::normalize), but a blank or non-positive as-is value takes the
    /// rounded `fallback` (typically a comps-suggested value) when one is supplied.
    pub fn normalize_with_as_is_fallback(
        &self,
        defaults: &OfferDefaults,
        fallback: Option<f64>,
    ) -> OfferInput {
        let base = &defaults.assumptions.finite_or_default();
        let assumptions = OfferAssumptions {
            profit_split: lenient_number(&self.profit_split, base.profit_split).clamp(0.0, 1.0),
            service_rate_base: lenient_number(&self.service_rate_base, base.service_rate_base),
            cash_discount_base: lenient_number(&self.cash_discount_base, base.cash_discount_base),
            carry_per_day: lenient_number(&self.carry_per_day, base.carry_per_day).max(0.0),
            reference_year: base.reference_year,
        };

        let (condition, friction) = self.selections();

        OfferInput {
            property: self.profile(&assumptions, fallback),
            condition,
            friction,
            timeline: parse_selection(&self.timeline, TimelineUrgency::default()),
            band: self.band(defaults),
            signal: self.signal,
            assumptions,
        }
    }

    pub fn band(&self, defaults: &OfferDefaults) -> ScenarioBand {
        parse_selection(&self.band, defaults.band)
    }

    pub fn subject_sqft(&self) -> u32 {
        lenient_number(&self.sqft, DEFAULT_SQFT)
            .round()
            .clamp(200.0, 20_000.0) as u32
    }

    /// Explicit ZIP, else the first ZIP found in the address.
    pub fn resolved_zip(&self) -> String {
        let explicit = self.zip.trim();
        if !explicit.is_empty() {
            return explicit.to_string();
        }
        parse_zip_from_address(&self.address).unwrap_or_default()
    }

    fn profile(&self, assumptions: &OfferAssumptions, fallback: Option<f64>) -> PropertyProfile {
        let newest = f64::from(assumptions.reference_year).max(1900.0);
        let year_built = lenient_number(&self.year_built, DEFAULT_YEAR_BUILT)
            .round()
            .max(1900.0)
            .min(newest) as u16;
        let beds = lenient_number(&self.beds, DEFAULT_BEDS)
            .round()
            .clamp(0.0, 20.0) as u8;
        let baths = lenient_number(&self.baths, DEFAULT_BATHS).max(0.0);

        let mut as_is_value = lenient_number(&self.as_is, 0.0);
        if as_is_value <= 0.0 {
            if let Some(suggested) = fallback.filter(|value| value.is_finite() && *value > 0.0) {
                as_is_value = suggested.round();
            }
        }

        PropertyProfile {
            address: self.address.trim().to_string(),
            zip: self.resolved_zip(),
            property_type: parse_selection(&self.property_type, PropertyType::default()),
            year_built,
            beds,
            baths,
            sqft: self.subject_sqft(),
            as_is_value,
        }
    }

    /// Preset (if any) provides the baseline; explicit fields override it.
    fn selections(&self) -> (ConditionSelections, FrictionSelections) {
        let (base_condition, base_friction) = match self.preset.trim() {
            "" => (ConditionSelections::default(), FrictionSelections::default()),
            raw => parse_selection(raw, ConditionPreset::Turnkey).selections(),
        };

        let bathrooms_to_redo = if self.bathrooms_to_redo.trim().is_empty() {
            base_condition.bathrooms_to_redo
        } else {
            lenient_number(&self.bathrooms_to_redo, 0.0)
                .round()
                .clamp(0.0, 3.0) as u8
        };

        let condition = ConditionSelections {
            roof: parse_selection(&self.roof, base_condition.roof),
            exterior: parse_selection(&self.exterior, base_condition.exterior),
            foundation: parse_selection(&self.foundation, base_condition.foundation),
            basement: parse_selection(&self.basement, base_condition.basement),
            hvac: parse_selection(&self.hvac, base_condition.hvac),
            electrical: parse_selection(&self.electrical, base_condition.electrical),
            plumbing: parse_selection(&self.plumbing, base_condition.plumbing),
            windows: parse_selection(&self.windows, base_condition.windows),
            kitchen: parse_selection(&self.kitchen, base_condition.kitchen),
            bathrooms_to_redo,
            flooring: parse_selection(&self.flooring, base_condition.flooring),
            hazards: parse_selection(&self.hazards, base_condition.hazards),
        };

        let friction = FrictionSelections {
            hoa: parse_selection(&self.hoa, base_friction.hoa),
            occupancy: parse_selection(&self.occupancy, base_friction.occupancy),
            title: parse_selection(&self.title, base_friction.title),
            access: parse_selection(&self.access, base_friction.access),
        };

        (condition, friction)
    }
}
