use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::offer::domain::ScenarioBand;

/// One sold comparable near the subject property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparableSale {
    pub address: String,
    pub price: f64,
    pub area_sqft: f64,
    pub distance_miles: f64,
    pub sale_date: Option<NaiveDate>,
    pub note: String,
}

impl ComparableSale {
    /// Only comps with a positive price and area contribute.
    pub fn is_valid(&self) -> bool {
        self.price > 0.0 && self.area_sqft > 0.0
    }

    pub fn price_per_area(&self) -> f64 {
        if self.is_valid() {
            self.price / self.area_sqft
        } else {
            0.0
        }
    }
}

/// Subject-side inputs the aggregator weighs comps against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompsContext {
    pub subject_area: f64,
    pub band: ScenarioBand,
    /// Reference date for recency weighting.
    pub as_of: NaiveDate,
    /// Partnership net from the latest offer run, used to calibrate the suggested offer.
    pub partnership_anchor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompsStats {
    pub comps_used: usize,
    pub avg_price: f64,
    pub median_price: f64,
    pub avg_price_per_area: f64,
    pub weighted_price_per_area: f64,
    pub subject_suggested_value: f64,
    /// Suggested value +/- 6%.
    pub confidence_band: (f64, f64),
    pub discount: f64,
    pub suggested_offer: f64,
}

impl CompsStats {
    /// Rounded suggested value, suitable for an as-is field.
    pub fn as_is_value(&self) -> f64 {
        self.subject_suggested_value.round()
    }
}
