//! Legal, access, location, and hyperlocal adjustments.
//!
//! Every contribution here is additive: percentage terms are folded into the cash discount
//! and service rate by the calculator, which applies the clamps once at the end.

use super::domain::{
    AccessStatus, FrictionSelections, HoaStatus, HyperlocalSignal, Occupancy, TitleStatus,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

impl HoaStatus {
    pub const fn friction_rate(self) -> f64 {
        match self {
            Self::No => 0.0,
            Self::Yes => 0.003,
        }
    }
}

impl Occupancy {
    pub const fn friction_rate(self) -> f64 {
        match self {
            Self::Owner => 0.0,
            Self::Tenant => 0.004,
            Self::Vacant => 0.002,
            Self::Squatter => 0.018,
        }
    }

    pub const fn friction_dollars(self) -> f64 {
        match self {
            Self::Owner => 0.0,
            Self::Tenant => 1500.0,
            Self::Vacant => 500.0,
            Self::Squatter => 7000.0,
        }
    }
}

impl TitleStatus {
    pub const fn friction_rate(self) -> f64 {
        match self {
            Self::Clean => 0.0,
            Self::Liens => 0.006,
            Self::Probate => 0.012,
            Self::PreForeclosure => 0.01,
        }
    }

    pub const fn friction_dollars(self) -> f64 {
        match self {
            Self::Clean => 0.0,
            Self::Liens | Self::Probate => 2000.0,
            Self::PreForeclosure => 3000.0,
        }
    }
}

impl AccessStatus {
    pub const fn friction_rate(self) -> f64 {
        match self {
            Self::Easy => 0.0,
            Self::Limited => 0.004,
            Self::Blocked => 0.012,
        }
    }

    /// Easy access is a small credit.
    pub const fn friction_dollars(self) -> f64 {
        match self {
            Self::Easy => -500.0,
            Self::Limited => 1000.0,
            Self::Blocked => 10000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrictionAdjustment {
    /// Added to both the cash discount and the service rate, and charged against ARV at close.
    pub pct: f64,
    /// Subtracted directly from both nets.
    pub dollars: f64,
}

pub fn selection_friction(selections: &FrictionSelections) -> FrictionAdjustment {
    FrictionAdjustment {
        pct: selections.hoa.friction_rate()
            + selections.occupancy.friction_rate()
            + selections.title.friction_rate()
            + selections.access.friction_rate(),
        dollars: selections.occupancy.friction_dollars()
            + selections.title.friction_dollars()
            + selections.access.friction_dollars(),
    }
}

static NOISE_PATTERN: OnceLock<Regex> = OnceLock::new();
static RAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
static INDUSTRIAL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn noise_pattern() -> &'static Regex {
    NOISE_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(hwy|highway|freeway|exp(ress)?way|i-[0-9]+|us-[0-9]+|state[ \t]+route|ave[ \t]+of[ \t]+the[ \t]+americas)\b",
        )
        .expect("valid noise pattern")
    })
}

fn rail_pattern() -> &'static Regex {
    RAIL_PATTERN
        .get_or_init(|| Regex::new(r"(?i)\b(rail|train|tracks)\b").expect("valid rail pattern"))
}

fn industrial_pattern() -> &'static Regex {
    INDUSTRIAL_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(industrial|plant|warehouse|refinery)\b")
            .expect("valid industrial pattern")
    })
}

/// Proximity penalties inferred from keywords in the street address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressFlags {
    pub noise: f64,
    pub rail: f64,
    pub industrial: f64,
}

impl AddressFlags {
    pub fn total(&self) -> f64 {
        self.noise + self.rail + self.industrial
    }
}

pub fn address_flags(address: &str) -> AddressFlags {
    let penalty = |pattern: &Regex, value: f64| {
        if pattern.is_match(address) {
            value
        } else {
            0.0
        }
    };

    AddressFlags {
        noise: penalty(noise_pattern(), 0.006),
        rail: penalty(rail_pattern(), 0.004),
        industrial: penalty(industrial_pattern(), 0.005),
    }
}

/// Contribution of an optional hyperlocal signal, with 0-100 composite scores for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalAdjustment {
    pub cash: f64,
    pub service: f64,
    pub carry_multiplier: f64,
    pub crime_score: u8,
    pub school_score: u8,
    pub vibe_score: u8,
    pub notes: String,
}

impl SignalAdjustment {
    pub fn neutral() -> Self {
        Self {
            cash: 0.0,
            service: 0.0,
            carry_multiplier: 1.0,
            crime_score: 50,
            school_score: 50,
            vibe_score: 50,
            notes: "No external signals applied.".to_string(),
        }
    }
}

fn risk(value: Option<f64>) -> f64 {
    match value {
        Some(raw) if !raw.is_nan() => raw.clamp(0.0, 1.0),
        _ => 0.5,
    }
}

fn score(unit: f64) -> u8 {
    (unit.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Stepped dollar penalty once the crime composite reaches 65; expressed against a $100k basis.
fn crime_penalty(crime_score: u8) -> u32 {
    let mut penalty = 2000;
    for threshold in [75, 85, 95] {
        if crime_score > threshold {
            penalty += 1000;
        }
    }
    penalty
}

pub fn signal_adjustment(signal: Option<&HyperlocalSignal>) -> SignalAdjustment {
    let Some(signal) = signal else {
        return SignalAdjustment::neutral();
    };

    let crime_composite = 0.5 * risk(signal.crime_index)
        + 0.3 * risk(signal.flood_risk)
        + 0.2 * risk(signal.wildfire_risk);
    let crime_score = score(crime_composite);
    let school_score = score(risk(signal.school_index));
    let vibe_score = score(risk(signal.review_delta));

    let mut notes = Vec::with_capacity(4);
    let mut cash = 0.0;
    let mut service = 0.0;
    let mut carry_multiplier = 1.0;

    let crime = f64::from(crime_score) / 100.0;
    cash += 0.016 * crime;
    service += 0.005 * crime;
    carry_multiplier += 0.12 * crime;
    notes.push(format!("Crime/Safety {crime_score}"));

    if crime_score >= 65 {
        let penalty = crime_penalty(crime_score);
        cash += f64::from(penalty) / 100_000.0;
        notes.push(format!("Crime Penalty +${penalty}"));
    } else if crime_score < 20 {
        cash -= 500.0 / 100_000.0;
        notes.push("Crime Bonus +$500".to_string());
    }

    let school = f64::from(school_score) / 100.0;
    cash += 0.01 * school;
    service += 0.003 * school;
    notes.push(format!("School/Socio {school_score}"));

    let vibe = f64::from(vibe_score) / 100.0;
    service += 0.007 * vibe;
    carry_multiplier += 0.06 * vibe;
    notes.push(format!("Local Vibe {vibe_score}"));

    SignalAdjustment {
        cash,
        service,
        carry_multiplier,
        crime_score,
        school_score,
        vibe_score,
        notes: format!("Hyperlocal: {}", notes.join(" • ")),
    }
}
