//! ZIP-level market classification.
//!
//! Buckets are a pure function of the ZIP string: the five-digit prefix is hashed with a
//! 32-bit polynomial rolling hash and every index is read off that hash. Nothing here
//! touches the network or any external dataset.

use super::domain::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static ZIP_PATTERN: OnceLock<Regex> = OnceLock::new();

fn zip_pattern() -> &'static Regex {
    ZIP_PATTERN.get_or_init(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("valid ZIP pattern"))
}

pub fn is_valid_zip(zip: &str) -> bool {
    zip_pattern().is_match(zip.trim())
}

/// `h := h*31 + code_unit` over UTF-16 code units, wrapped to `i32` each step, then made
/// non-negative. `i32::MIN` maps to `2^31`, so the result is widened to `i64`.
pub fn string_hash(value: &str) -> i64 {
    let mut h: i32 = 0;
    for unit in value.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    i64::from(h).abs()
}

/// Arithmetic right shift on the 32-bit view of a hash.
pub(crate) fn shifted(hash: i64, bits: u32) -> i64 {
    i64::from((hash as u32 as i32) >> bits)
}

/// Liquidity / economic-stability index (LESI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityIndex {
    VeryStable,
    Stable,
    Mixed,
    Unstable,
    HighRisk,
}

impl StabilityIndex {
    fn from_score(score: i64) -> Self {
        match score {
            s if s >= 80 => Self::VeryStable,
            s if s >= 65 => Self::Stable,
            s if s >= 50 => Self::Mixed,
            s if s >= 35 => Self::Unstable,
            _ => Self::HighRisk,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryStable => "very_stable",
            Self::Stable => "stable",
            Self::Mixed => "mixed",
            Self::Unstable => "unstable",
            Self::HighRisk => "high_risk",
        }
    }

    /// Certainty premium added to the cash discount.
    pub const fn cash_certainty_adjustment(self) -> f64 {
        match self {
            Self::VeryStable => 0.01,
            Self::Stable => 0.02,
            Self::Mixed => 0.04,
            Self::Unstable => 0.06,
            Self::HighRisk => 0.08,
        }
    }

    /// Scales the configured per-day carry rate.
    pub const fn carry_rate_multiplier(self) -> f64 {
        match self {
            Self::VeryStable => 0.8,
            Self::Stable => 0.9,
            Self::Mixed => 1.0,
            Self::Unstable => 1.15,
            Self::HighRisk => 1.25,
        }
    }
}

/// Buyer-demand index (BDI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandIndex {
    Hot,
    Strong,
    Balanced,
    Soft,
    VerySoft,
}

impl DemandIndex {
    fn from_score(score: i64) -> Self {
        match score {
            s if s >= 80 => Self::Hot,
            s if s >= 65 => Self::Strong,
            s if s >= 50 => Self::Balanced,
            s if s >= 35 => Self::Soft,
            _ => Self::VerySoft,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Strong => "strong",
            Self::Balanced => "balanced",
            Self::Soft => "soft",
            Self::VerySoft => "very_soft",
        }
    }

    pub const fn cash_adjustment(self) -> f64 {
        match self {
            Self::Hot => -0.015,
            Self::Strong => -0.008,
            Self::Balanced => 0.0,
            Self::Soft => 0.008,
            Self::VerySoft => 0.015,
        }
    }

    pub const fn base_days(self) -> u32 {
        match self {
            Self::Hot => 30,
            Self::Strong => 40,
            Self::Balanced => 55,
            Self::Soft => 70,
            Self::VerySoft => 85,
        }
    }
}

/// Three-level closing risk used for both RCI (cost) and RFI (frequency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// RCI: multiplier on the demand-driven base days.
    pub const fn time_factor(self) -> f64 {
        match self {
            Self::Low => 0.95,
            Self::Medium => 1.0,
            Self::High => 1.25,
        }
    }

    /// RFI: closing-cost rate charged against ARV.
    pub const fn closing_cost_rate(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 0.0035,
            Self::High => 0.008,
        }
    }

    /// RFI: extra days added before condition scaling.
    pub const fn days_offset(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 4.0,
            Self::High => 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBucket {
    pub zip5: String,
    pub lesi: StabilityIndex,
    pub bdi: DemandIndex,
    pub rci: RiskLevel,
    pub rfi: RiskLevel,
    pub base_days: u32,
    /// Synthetic six-point demand trend; the last point drives `bdi`.
    pub trend: [i64; 6],
}

pub fn resolve_market_bucket(zip: &str) -> Result<MarketBucket, ValidationError> {
    let trimmed = zip.trim();
    if !is_valid_zip(trimmed) {
        return Err(ValidationError::InvalidZip {
            value: zip.to_string(),
        });
    }

    let zip5 = trimmed.get(..5).ok_or_else(|| ValidationError::InvalidZip {
        value: zip.to_string(),
    })?;
    let h = string_hash(zip5);

    let lesi = StabilityIndex::from_score(h % 100);

    let base = 50 + (h % 40) - 10;
    let slope = (shifted(h, 3) % 7) - 3;
    let mut trend = [0_i64; 6];
    for (step, point) in trend.iter_mut().enumerate() {
        let jitter = shifted(h, step as u32) % 6 - 3;
        *point = (base + step as i64 * slope + jitter).clamp(20, 95);
    }
    let bdi = DemandIndex::from_score(trend[5]);

    let first_digit = zip5
        .chars()
        .next()
        .and_then(|digit| digit.to_digit(10))
        .unwrap_or(5);
    let rci = match first_digit {
        0..=2 => RiskLevel::Low,
        3..=6 => RiskLevel::Medium,
        _ => RiskLevel::High,
    };
    let rfi = match first_digit {
        0 | 1 => RiskLevel::High,
        2..=4 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    };

    Ok(MarketBucket {
        zip5: zip5.to_string(),
        lesi,
        bdi,
        rci,
        rfi,
        base_days: bdi.base_days(),
        trend,
    })
}
