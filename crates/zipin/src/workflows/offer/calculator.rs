//! Offer composition: value-add, carry, closing friction, and the two competing nets.

use super::band::BandProfile;
use super::condition::{cosmetic_weight, estimate_repairs, heavy_weight, RepairEstimate};
use super::domain::{
    BasementCondition, ConditionSelections, FoundationCondition, HazardCondition, OfferInput,
    PropertyType, ScenarioBand, TimelineUrgency, ValidationError,
};
use super::friction::{
    address_flags, selection_friction, signal_adjustment, AddressFlags, FrictionAdjustment,
    SignalAdjustment,
};
use super::market::{resolve_market_bucket, DemandIndex, MarketBucket, RiskLevel, StabilityIndex};
use serde::{Deserialize, Serialize};

pub const CASH_DISCOUNT_BOUNDS: (f64, f64) = (0.08, 0.45);
/// Partnership must beat cash by more than this factor to be recommended outright.
pub const PARTNERSHIP_MARGIN: f64 = 1.03;
pub const MIN_CASH_DAYS: u32 = 7;
pub const MIN_PARTNERSHIP_DAYS: u32 = 14;

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn norm(value: f64, lo: f64, hi: f64) -> f64 {
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Adjustments a seller's timeline applies to the offer terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UrgencyAdjustment {
    pub cash_discount: f64,
    pub service_rate: f64,
    /// Scales partnership days.
    pub carry_multiplier: f64,
    /// Scales cash days.
    pub days_multiplier: f64,
}

impl TimelineUrgency {
    pub const fn adjustment(self) -> UrgencyAdjustment {
        match self {
            Self::Normal => UrgencyAdjustment {
                cash_discount: 0.0,
                service_rate: 0.0,
                carry_multiplier: 1.0,
                days_multiplier: 1.0,
            },
            Self::Fast => UrgencyAdjustment {
                cash_discount: -0.018,
                service_rate: -0.008,
                carry_multiplier: 0.85,
                days_multiplier: 0.7,
            },
            Self::Rush => UrgencyAdjustment {
                cash_discount: -0.035,
                service_rate: -0.015,
                carry_multiplier: 0.6,
                days_multiplier: 0.5,
            },
        }
    }
}

impl PropertyType {
    const fn value_add_factor(self) -> f64 {
        match self {
            Self::TwoToFourUnit => 1.12,
            Self::Condo => 0.85,
            Self::SingleFamily | Self::Townhome => 1.0,
        }
    }

    const fn days_adjustment(self) -> f64 {
        match self {
            Self::TwoToFourUnit => 0.12,
            Self::Condo => -0.06,
            Self::SingleFamily | Self::Townhome => 0.0,
        }
    }

    const fn service_adjustment(self) -> f64 {
        match self {
            Self::TwoToFourUnit => 0.01,
            Self::Condo => -0.006,
            Self::SingleFamily | Self::Townhome => 0.0,
        }
    }
}

/// Condition-driven stretch on days to close.
fn condition_days_adjustment(condition: &ConditionSelections) -> f64 {
    let foundation = match condition.foundation {
        FoundationCondition::MajorStructural => 0.35,
        FoundationCondition::MinorSettling => 0.12,
        FoundationCondition::Sound => 0.0,
    };
    let basement = match condition.basement {
        BasementCondition::Mold => 0.25,
        BasementCondition::PastFlooding => 0.18,
        BasementCondition::Damp => 0.08,
        BasementCondition::Dry => 0.0,
    };
    let hazards = if condition.hazards == HazardCondition::None {
        0.0
    } else {
        0.15
    };
    foundation + basement + hazards
}

/// Extra cash discount for conditions that scare off retail buyers.
fn heavy_penalty(condition: &ConditionSelections) -> f64 {
    let foundation = match condition.foundation {
        FoundationCondition::MajorStructural => 0.03,
        FoundationCondition::MinorSettling => 0.01,
        FoundationCondition::Sound => 0.0,
    };
    let basement = match condition.basement {
        BasementCondition::Mold => 0.02,
        BasementCondition::PastFlooding => 0.012,
        BasementCondition::Damp | BasementCondition::Dry => 0.0,
    };
    let hazards = match condition.hazards {
        HazardCondition::MethHoarder => 0.025,
        HazardCondition::AsbestosLead => 0.01,
        HazardCondition::None => 0.0,
    };
    foundation + basement + hazards
}

fn age_service_adjustment(age: f64) -> f64 {
    if age > 70.0 {
        0.01
    } else if age < 20.0 {
        -0.006
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Partnership,
    Cash,
    CloseCall,
}

impl Recommendation {
    /// Partnership needs a strict margin over cash; ties and thin leads go to cash or review.
    pub fn from_nets(cash_net: f64, partnership_net: f64) -> Self {
        if partnership_net > cash_net * PARTNERSHIP_MARGIN {
            Self::Partnership
        } else if cash_net >= partnership_net {
            Self::Cash
        } else {
            Self::CloseCall
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Partnership => "Partnership (Novation)",
            Self::Cash => "Guaranteed Cash Offer",
            Self::CloseCall => "Close Call — Review Live",
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::Partnership => "Higher net after scope & friction management.",
            Self::Cash => "Urgency/condition stack favors certainty over upside.",
            Self::CloseCall => "Comparable nets; quick scope & comps can tilt either way.",
        }
    }
}

/// Certainty (low) versus upside (high) score in `[8, 92]`.
pub fn tilt_score(delta: f64, delta_pct: f64) -> f64 {
    let tilt = if delta_pct.abs() < 1.0 {
        50.0
    } else if delta >= 0.0 {
        55.0 + (delta_pct / 3.0).min(35.0)
    } else {
        45.0 - (delta_pct.abs() / 3.0).min(35.0)
    };
    tilt.clamp(8.0, 92.0)
}

/// Every intermediate term behind the two nets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferBreakdown {
    pub arv: f64,
    pub value_add: f64,
    pub value_add_pct: f64,
    /// Band-scaled repair total.
    pub repairs: f64,
    pub closing_friction: f64,
    pub carry: f64,
    pub all_in: f64,
    pub profit: f64,
    pub cash_discount: f64,
    pub service_rate: f64,
    pub anchor: f64,
    pub floor: f64,
    pub carry_days: f64,
    pub daily_rate: f64,
    pub heavy_penalty: f64,
    pub friction: FrictionAdjustment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferResult {
    pub cash_net: f64,
    pub partnership_net: f64,
    pub delta: f64,
    pub delta_pct: f64,
    pub days_cash: u32,
    pub days_partnership: u32,
    pub tilt: f64,
    pub recommendation: Recommendation,
    pub band: ScenarioBand,
    pub breakdown: OfferBreakdown,
    pub market: MarketBucket,
    /// Unscaled itemized estimate; `breakdown.repairs` carries the band-scaled total.
    pub repair_estimate: RepairEstimate,
    pub address_flags: AddressFlags,
    pub signal: SignalAdjustment,
}

impl OfferResult {
    pub fn snapshot(&self) -> OfferSnapshot {
        OfferSnapshot {
            cash_net: self.cash_net,
            partnership_net: self.partnership_net,
            delta: self.delta,
            delta_pct: self.delta_pct,
            days_cash: self.days_cash,
            days_partnership: self.days_partnership,
            tilt: self.tilt,
            recommendation: self.recommendation,
            band: self.band,
            arv: self.breakdown.arv,
            repairs: self.breakdown.repairs,
            cash_discount: self.breakdown.cash_discount,
            service_rate: self.breakdown.service_rate,
            lesi: self.market.lesi,
            bdi: self.market.bdi,
            rci: self.market.rci,
            rfi: self.market.rfi,
        }
    }
}

/// Flat record of an offer run for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSnapshot {
    pub cash_net: f64,
    pub partnership_net: f64,
    pub delta: f64,
    pub delta_pct: f64,
    pub days_cash: u32,
    pub days_partnership: u32,
    pub tilt: f64,
    pub recommendation: Recommendation,
    pub band: ScenarioBand,
    pub arv: f64,
    pub repairs: f64,
    pub cash_discount: f64,
    pub service_rate: f64,
    pub lesi: StabilityIndex,
    pub bdi: DemandIndex,
    pub rci: RiskLevel,
    pub rfi: RiskLevel,
}

/// Stateless single-pass valuation over an [`OfferInput`] snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferEngine;

impl OfferEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, input: &OfferInput) -> Result<OfferResult, ValidationError> {
        let property = &input.property;
        let market = resolve_market_bucket(&property.zip)?;

        let as_is = property.as_is_value;
        if !as_is.is_finite() || as_is <= 0.0 {
            return Err(ValidationError::NonPositiveAsIs { value: as_is });
        }

        let condition = &input.condition;
        let assumptions = &input.assumptions.finite_or_default();
        let band: BandProfile = input.band.profile();
        let urgency = input.timeline.adjustment();
        let property_type = property.property_type;

        let flags = address_flags(&property.address);
        let address_penalty = flags.total();
        let signal = signal_adjustment(input.signal.as_ref());
        let friction = selection_friction(&input.friction);

        let age = (f64::from(assumptions.reference_year) - f64::from(property.year_built))
            .clamp(0.0, 120.0);
        let sqft = f64::from(property.sqft);
        let size_n = norm(sqft, 800.0, 3200.0);
        let age_n = norm(age, 10.0, 90.0);

        let estimate = estimate_repairs(property_type, property.sqft, condition);

        let uplift_weight =
            (0.6 * cosmetic_weight(condition) + 0.4 * heavy_weight(condition)).clamp(0.0, 1.0);
        let value_add_pct = lerp(0.06, 0.18, uplift_weight)
            * property_type.value_add_factor()
            * lerp(0.95, 1.1, size_n)
            * lerp(0.9, 1.12, 1.0 - age_n)
            * band.rvi;
        let value_add = as_is * value_add_pct;
        let arv = as_is + value_add;

        let base_days_raw =
            f64::from(market.base_days) * market.rci.time_factor() + market.rfi.days_offset();
        let days_factor = 1.0
            + condition_days_adjustment(condition)
            + property_type.days_adjustment()
            + lerp(-0.03, 0.09, age_n)
            + lerp(-0.06, 0.1, size_n);
        let carry_days = base_days_raw
            * days_factor
            * signal.carry_multiplier
            * urgency.carry_multiplier
            * band.carry;

        let daily_rate = assumptions.carry_per_day * market.lesi.carry_rate_multiplier();
        let heavy_penalty = heavy_penalty(condition);

        let (cash_lo, cash_hi) = CASH_DISCOUNT_BOUNDS;
        let cash_discount = (assumptions.cash_discount_base
            + market.lesi.cash_certainty_adjustment()
            + market.bdi.cash_adjustment()
            + heavy_penalty
            + friction.pct
            + address_penalty
            + signal.cash
            + urgency.cash_discount
            + band.cash)
            .clamp(cash_lo, cash_hi);

        let structural = if condition.foundation == FoundationCondition::MajorStructural {
            0.01
        } else {
            0.0
        };
        let (svc_lo, svc_hi) = band.service_rate_bounds();
        let service_rate = (assumptions.service_rate_base
            + friction.pct
            + property_type.service_adjustment()
            + lerp(-0.004, 0.01, size_n)
            + age_service_adjustment(age)
            + address_penalty
            + signal.service
            + structural
            + urgency.service_rate
            + band.svc)
            .clamp(svc_lo, svc_hi);

        let repairs = estimate.total * band.repairs;
        let closing_friction = market.rfi.closing_cost_rate() * arv + friction.pct * arv;
        let carry = carry_days * daily_rate * arv;
        let all_in = as_is + repairs + closing_friction + carry;
        let profit = (arv - all_in).max(0.0);

        let cash_net = as_is * (1.0 - cash_discount) - friction.dollars;
        let partnership_raw = as_is + profit * assumptions.profit_split - friction.dollars;
        let anchor = as_is * (1.0 - service_rate);
        let floor = anchor * band.prox;
        let partnership_net = partnership_raw.max(floor).min(anchor);

        let days_cash = ((base_days_raw * urgency.days_multiplier).round() as u32).max(MIN_CASH_DAYS);
        let days_partnership = (carry_days.round() as u32).max(MIN_PARTNERSHIP_DAYS);

        let delta = partnership_net - cash_net;
        let delta_pct = if cash_net > 0.0 {
            delta / cash_net * 100.0
        } else {
            0.0
        };

        Ok(OfferResult {
            cash_net,
            partnership_net,
            delta,
            delta_pct,
            days_cash,
            days_partnership,
            tilt: tilt_score(delta, delta_pct),
            recommendation: Recommendation::from_nets(cash_net, partnership_net),
            band: input.band,
            breakdown: OfferBreakdown {
                arv,
                value_add,
                value_add_pct,
                repairs,
                closing_friction,
                carry,
                all_in,
                profit,
                cash_discount,
                service_rate,
                anchor,
                floor,
                carry_days,
                daily_rate,
                heavy_penalty,
                friction,
            },
            market,
            repair_estimate: estimate,
            address_flags: flags,
            signal,
        })
    }
}
