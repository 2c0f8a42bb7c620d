//! Similarity-weighted price-per-area estimate from comparable sales.

use chrono::NaiveDate;

use super::domain::{ComparableSale, CompsContext, CompsStats};
use crate::workflows::offer::domain::ScenarioBand;

const CONFIDENCE_SPREAD: f64 = 0.06;
const UNDATED_AGE_DAYS: f64 = 90.0;

/// Similarity weight in `[0.05, 1]`; a same-size, same-day, zero-distance comp scores 1.
///
/// Sale age is counted in whole calendar days between `sale_date` and `as_of` (at least one).
/// Sales dated after `as_of` count as one day old.
pub fn comp_weight(comp: &ComparableSale, subject_area: f64, as_of: NaiveDate) -> f64 {
    let reference_area = if subject_area > 0.0 {
        subject_area
    } else {
        comp.area_sqft
    };
    let size_penalty =
        ((comp.area_sqft - reference_area).abs() / reference_area.max(600.0)).min(0.4);

    let age_days = comp
        .sale_date
        .map(|sold| ((as_of - sold).num_days() as f64).max(1.0))
        .unwrap_or(UNDATED_AGE_DAYS);
    let recency_penalty = ((age_days - 30.0) / 365.0).clamp(0.0, 0.35);

    let distance_penalty = (comp.distance_miles.max(0.0) / 5.0).min(0.25);

    (1.0 - (size_penalty + recency_penalty + distance_penalty)).clamp(0.05, 1.0)
}

pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();
    match count {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Discount off the suggested value before the average-price cap.
pub fn offer_discount(band: ScenarioBand) -> f64 {
    let mut discount = 0.10 + band.profile().svc.max(0.0) * 0.6;
    match band {
        ScenarioBand::Conservative => discount += 0.02,
        ScenarioBand::Stretch => discount -= 0.015,
        ScenarioBand::Likely => {}
    }
    discount.clamp(0.08, 0.18)
}

/// Returns `None` when no comp has both a positive price and area.
pub fn aggregate(comps: &[ComparableSale], context: &CompsContext) -> Option<CompsStats> {
    let valid: Vec<&ComparableSale> = comps.iter().filter(|comp| comp.is_valid()).collect();
    if valid.is_empty() {
        return None;
    }

    let prices: Vec<f64> = valid.iter().map(|comp| comp.price).collect();
    let avg_price = prices.iter().sum::<f64>() / prices.len() as f64;
    let median_price = median(&prices);
    let avg_price_per_area =
        valid.iter().map(|comp| comp.price_per_area()).sum::<f64>() / valid.len() as f64;

    let (weight_sum, weighted_sum) = valid.iter().fold((0.0, 0.0), |(weights, total), comp| {
        let weight = comp_weight(comp, context.subject_area, context.as_of);
        (weights + weight, total + weight * comp.price_per_area())
    });
    let weighted_price_per_area = if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        avg_price_per_area
    };

    let subject_suggested_value = if context.subject_area > 0.0 && weighted_price_per_area > 0.0 {
        weighted_price_per_area * context.subject_area
    } else if median_price > 0.0 {
        median_price
    } else {
        avg_price
    };

    let discount = offer_discount(context.band);
    let mut core_offer = subject_suggested_value * (1.0 - discount);
    if avg_price > 0.0 {
        core_offer = core_offer.min(avg_price * 0.93);
    }

    let suggested_offer = match context
        .partnership_anchor
        .filter(|anchor| anchor.is_finite() && *anchor != 0.0)
    {
        Some(anchor) => (core_offer * 0.3 + anchor * 0.7)
            .max(subject_suggested_value * 0.8)
            .min(subject_suggested_value * 0.95),
        None => core_offer,
    };

    Some(CompsStats {
        comps_used: valid.len(),
        avg_price,
        median_price,
        avg_price_per_area,
        weighted_price_per_area,
        subject_suggested_value,
        confidence_band: (
            subject_suggested_value * (1.0 - CONFIDENCE_SPREAD),
            subject_suggested_value * (1.0 + CONFIDENCE_SPREAD),
        ),
        discount,
        suggested_offer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn comp(price: f64, area: f64, miles: f64, sold: Option<NaiveDate>) -> ComparableSale {
        ComparableSale {
            address: "comp".to_string(),
            price,
            area_sqft: area,
            distance_miles: miles,
            sale_date: sold,
            note: String::new(),
        }
    }

    #[test]
    fn identical_same_day_comp_has_full_weight() {
        let exact = comp(300_000.0, 1600.0, 0.0, Some(as_of()));
        assert_eq!(comp_weight(&exact, 1600.0, as_of()), 1.0);
    }

    #[test]
    fn undated_comp_is_treated_as_ninety_days_old() {
        let undated = comp(300_000.0, 1600.0, 0.0, None);
        let expected = 1.0 - 60.0 / 365.0;
        assert!((comp_weight(&undated, 1600.0, as_of()) - expected).abs() < 1e-12);
    }

    #[test]
    fn age_counts_whole_calendar_days() {
        let sold = NaiveDate::from_ymd_opt(2025, 4, 2);
        let sixty_days = comp(300_000.0, 1600.0, 0.0, sold);
        let expected = 1.0 - 30.0 / 365.0;
        assert!((comp_weight(&sixty_days, 1600.0, as_of()) - expected).abs() < 1e-12);

        let future = comp(300_000.0, 1600.0, 0.0, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(comp_weight(&future, 1600.0, as_of()), 1.0);
    }

    #[test]
    fn penalties_cap_and_weight_floors() {
        let far_old_big = comp(
            900_000.0,
            9000.0,
            40.0,
            NaiveDate::from_ymd_opt(2015, 1, 1),
        );
        assert_eq!(comp_weight(&far_old_big, 1600.0, as_of()), 0.05);
    }

    #[test]
    fn missing_subject_area_ignores_size() {
        let sized = comp(300_000.0, 2400.0, 0.0, Some(as_of()));
        assert_eq!(comp_weight(&sized, 0.0, as_of()), 1.0);
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn discount_by_band() {
        assert!((offer_discount(ScenarioBand::Likely) - 0.10).abs() < 1e-12);
        assert!((offer_discount(ScenarioBand::Conservative) - 0.1248).abs() < 1e-12);
        assert!((offer_discount(ScenarioBand::Stretch) - 0.085).abs() < 1e-12);
    }

    #[test]
    fn invalid_comps_are_ignored() {
        let context = CompsContext {
            subject_area: 1600.0,
            band: ScenarioBand::Likely,
            as_of: as_of(),
            partnership_anchor: None,
        };
        assert!(aggregate(&[comp(0.0, 1600.0, 0.0, None)], &context).is_none());
        assert!(aggregate(&[], &context).is_none());
    }
}
