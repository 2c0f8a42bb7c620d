use super::common::*;
use super::super::calculator::{
    OfferEngine, Recommendation, CASH_DISCOUNT_BOUNDS, MIN_CASH_DAYS, MIN_PARTNERSHIP_DAYS,
};
use super::super::condition::ConditionPreset;
use super::super::domain::{
    AccessStatus, BasementCondition, FlooringCondition, FoundationCondition, HazardCondition,
    KitchenCondition, Occupancy, PropertyType, RoofCondition, ScenarioBand, Selection,
    TimelineUrgency, TitleStatus, ValidationError,
};
use super::super::config::OfferDefaults;
use super::super::market::{DemandIndex, RiskLevel, StabilityIndex};
use super::super::normalizer::OfferForm;

#[test]
fn baseline_run_favors_partnership() {
    let result = OfferEngine::new()
        .evaluate(&baseline_input())
        .expect("baseline evaluates");

    assert_close(result.cash_net, 258_500.0, CENTS);
    assert_close(result.partnership_net, 290_200.0, CENTS);
    assert_close(result.delta, 31_700.0, CENTS);
    assert_close(result.delta_pct, 12.263_056, 1e-5);
    assert_eq!(result.days_cash, 55);
    assert_eq!(result.days_partnership, 55);
    assert_eq!(result.recommendation, Recommendation::Partnership);

    let breakdown = &result.breakdown;
    assert_close(breakdown.arv, 326_071.2, CENTS);
    assert_close(breakdown.cash_discount, 0.14, 1e-9);
    assert_close(breakdown.anchor, 290_200.0, CENTS);
    assert_close(breakdown.floor, 281_494.0, CENTS);
    assert_eq!(breakdown.repairs, 0.0);
    assert_eq!(result.market.lesi, StabilityIndex::Mixed);
    assert_eq!(result.market.bdi, DemandIndex::Balanced);
}

#[test]
fn heavier_rehab_in_hot_market() {
    let mut input = baseline_input();
    input.property.zip = "78704".to_string();
    input.property.as_is_value = 400_000.0;
    input.property.sqft = 2000;
    input.property.year_built = 1960;
    input.condition.kitchen = KitchenCondition::Gut;
    input.condition.flooring = FlooringCondition::Full;
    input.condition.roof = RoofCondition::EndOfLife;

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");

    assert_eq!(result.market.lesi, StabilityIndex::Unstable);
    assert_eq!(result.market.bdi, DemandIndex::Hot);
    assert_eq!(result.market.rci, RiskLevel::High);
    assert_eq!(result.market.rfi, RiskLevel::Low);
    assert_close(result.breakdown.repairs, 20_780.0, CENTS);
    assert_close(result.breakdown.cash_discount, 0.145, 1e-9);
    assert_close(result.breakdown.service_rate, 0.035, 1e-9);
    assert_close(result.cash_net, 342_500.0, CENTS);
    assert_close(result.partnership_net, 386_000.0, CENTS);
    assert_eq!(result.days_cash, 38);
    assert_eq!(result.days_partnership, 40);
}

#[test]
fn bands_move_every_term_together() {
    let engine = OfferEngine::new();
    let mut input = baseline_input();

    input.band = ScenarioBand::Conservative;
    let conservative = engine.evaluate(&input).expect("conservative");
    input.band = ScenarioBand::Stretch;
    let stretch = engine.evaluate(&input).expect("stretch");

    assert_close(conservative.cash_net, 254_000.0, CENTS);
    assert_close(conservative.partnership_net, 287_800.0, CENTS);
    assert_eq!(conservative.days_partnership, 61);
    assert_close(stretch.cash_net, 261_500.0, CENTS);
    assert_close(stretch.partnership_net, 292_000.0, CENTS);
    assert_eq!(stretch.days_partnership, 50);

    assert!(conservative.breakdown.arv < stretch.breakdown.arv);
    assert_eq!(conservative.days_cash, stretch.days_cash);
}

#[test]
fn rush_timeline_trades_price_for_speed() {
    let mut input = baseline_input();
    input.timeline = TimelineUrgency::Rush;

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");

    assert_close(result.cash_net, 269_000.0, CENTS);
    assert_close(result.partnership_net, 294_000.0, CENTS);
    assert_eq!(result.days_cash, 28);
    assert_eq!(result.days_partnership, 33);
}

#[test]
fn address_keywords_raise_both_rates() {
    let mut input = baseline_input();
    input.property.address = "12 Industrial Hwy".to_string();

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");

    assert!(result.address_flags.noise > 0.0);
    assert!(result.address_flags.industrial > 0.0);
    assert_eq!(result.address_flags.rail, 0.0);
    assert_close(result.cash_net, 255_200.0, CENTS);
    assert_close(result.partnership_net, 286_900.0, CENTS);
}

#[test]
fn occupancy_title_and_access_cost_dollars_and_rate() {
    let mut input = baseline_input();
    input.friction.occupancy = Occupancy::Squatter;
    input.friction.title = TitleStatus::Probate;
    input.friction.access = AccessStatus::Blocked;

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");

    assert_close(result.breakdown.friction.dollars, 19_000.0, CENTS);
    assert_close(result.cash_net, 226_400.0, CENTS);
    assert_close(result.partnership_net, 277_600.0, CENTS);
}

#[test]
fn slow_market_lengthens_cash_clock() {
    let mut input = baseline_input();
    input.property.zip = "10001".to_string();

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");

    assert_eq!(result.market.bdi, DemandIndex::VerySoft);
    assert_eq!(result.days_cash, 91);
    assert_eq!(result.days_partnership, 90);
}

#[test]
fn zip_plus_four_uses_first_five_digits() {
    let engine = OfferEngine::new();
    let mut input = baseline_input();
    let plain = engine.evaluate(&input).expect("plain");
    input.property.zip = "55408-1234".to_string();
    let extended = engine.evaluate(&input).expect("zip+4");

    assert_eq!(plain.market.zip5, extended.market.zip5);
    assert_eq!(plain.snapshot(), extended.snapshot());
}

#[test]
fn tiny_as_is_still_respects_anchor() {
    let mut input = baseline_input();
    input.property.as_is_value = 1.0;

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");

    assert_close(result.partnership_net, result.breakdown.anchor, 1e-9);
    assert!(result.cash_net > result.partnership_net);
    assert_eq!(result.recommendation, Recommendation::Cash);
}

#[test]
fn rejects_malformed_zip() {
    let mut input = baseline_input();
    input.property.zip = "5540".to_string();

    match OfferEngine::new().evaluate(&input) {
        Err(ValidationError::InvalidZip { value }) => assert_eq!(value, "5540"),
        other => panic!("expected invalid zip, got {other:?}"),
    }
}

#[test]
fn rejects_zip_written_in_non_ascii_digits() {
    let engine = OfferEngine::new();
    for zip in ["\u{665}\u{665}\u{664}\u{660}\u{668}", "\u{FF15}\u{FF15}408"] {
        let mut input = baseline_input();
        input.property.zip = zip.to_string();
        assert!(
            matches!(engine.evaluate(&input), Err(ValidationError::InvalidZip { .. })),
            "{zip:?} should be rejected"
        );
    }

    let form = OfferForm {
        address: "12 Main St, Springfield \u{665}\u{665}\u{664}\u{660}\u{668}".to_string(),
        as_is: "300000".to_string(),
        ..OfferForm::default()
    };
    let input = form.normalize(&OfferDefaults::default());
    assert!(matches!(
        engine.evaluate(&input),
        Err(ValidationError::InvalidZip { .. })
    ));
}

#[test]
fn non_finite_assumptions_fall_back_to_defaults() {
    let engine = OfferEngine::new();
    let expected = engine.evaluate(&baseline_input()).expect("baseline evaluates");

    let mut input = baseline_input();
    input.assumptions.cash_discount_base = f64::NAN;
    input.assumptions.service_rate_base = f64::INFINITY;
    input.assumptions.profit_split = f64::NAN;
    input.assumptions.carry_per_day = f64::NEG_INFINITY;
    let result = engine.evaluate(&input).expect("evaluates");

    let (cash_lo, cash_hi) = CASH_DISCOUNT_BOUNDS;
    assert!((cash_lo..=cash_hi).contains(&result.breakdown.cash_discount));
    assert!(result.cash_net.is_finite() && result.partnership_net.is_finite());
    assert_close(result.cash_net, expected.cash_net, CENTS);
    assert_close(result.partnership_net, expected.partnership_net, CENTS);
    assert_eq!(result.recommendation, expected.recommendation);
}

#[test]
fn nan_defaults_do_not_leak_through_blank_fields() {
    let mut defaults = OfferDefaults::default();
    defaults.assumptions.cash_discount_base = f64::NAN;
    let form = OfferForm {
        zip: "55408".to_string(),
        as_is: "300000".to_string(),
        ..OfferForm::default()
    };
    let input = form.normalize(&defaults);
    assert_eq!(input.assumptions.cash_discount_base, 0.10);

    let result = OfferEngine::new().evaluate(&input).expect("evaluates");
    assert_close(result.cash_net, 258_500.0, CENTS);
}

#[test]
fn rejects_non_positive_as_is() {
    let engine = OfferEngine::new();
    for value in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let mut input = baseline_input();
        input.property.as_is_value = value;
        assert!(matches!(
            engine.evaluate(&input),
            Err(ValidationError::NonPositiveAsIs { .. })
        ));
    }
}

#[test]
fn zip_is_checked_before_as_is() {
    let mut input = baseline_input();
    input.property.zip = "abcde".to_string();
    input.property.as_is_value = 0.0;
    assert!(matches!(
        OfferEngine::new().evaluate(&input),
        Err(ValidationError::InvalidZip { .. })
    ));
}

#[test]
fn evaluation_is_deterministic() {
    let engine = OfferEngine::new();
    let input = baseline_input();
    let first = engine.evaluate(&input).expect("first");
    let second = engine.evaluate(&input).expect("second");
    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.breakdown.carry_days, second.breakdown.carry_days);
}

#[test]
fn clamps_and_floors_hold_across_the_grid() {
    let engine = OfferEngine::new();
    let (cash_lo, cash_hi) = CASH_DISCOUNT_BOUNDS;

    for zip in ["55408", "78704", "10001", "94110", "30301"] {
        for property_type in PropertyType::ordered() {
            for preset in ConditionPreset::ordered() {
                for band in ScenarioBand::ordered() {
                    for timeline in TimelineUrgency::ordered() {
                        let (condition, friction) = preset.selections();
                        let mut input = baseline_input();
                        input.property.zip = zip.to_string();
                        input.property.property_type = *property_type;
                        input.condition = condition;
                        input.friction = friction;
                        input.band = *band;
                        input.timeline = *timeline;

                        let result = engine.evaluate(&input).expect("grid evaluates");
                        let breakdown = &result.breakdown;
                        let (svc_lo, svc_hi) = band.profile().service_rate_bounds();

                        assert!(breakdown.cash_discount >= cash_lo - 1e-12);
                        assert!(breakdown.cash_discount <= cash_hi + 1e-12);
                        assert!(breakdown.service_rate >= svc_lo - 1e-12);
                        assert!(breakdown.service_rate <= svc_hi + 1e-12);
                        assert!(result.partnership_net <= breakdown.anchor + 1e-6);
                        assert!(result.partnership_net >= breakdown.floor - 1e-6);
                        assert!(breakdown.profit >= 0.0);
                        assert!(result.days_cash >= MIN_CASH_DAYS);
                        assert!(result.days_partnership >= MIN_PARTNERSHIP_DAYS);
                        assert!((10.0..=90.0).contains(&result.tilt));
                        assert_eq!(
                            result.recommendation,
                            Recommendation::from_nets(result.cash_net, result.partnership_net)
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn worse_condition_never_lowers_repairs() {
    let engine = OfferEngine::new();
    let mut previous = -1.0;
    for preset in ConditionPreset::ordered() {
        let (condition, _) = preset.selections();
        let mut input = baseline_input();
        input.condition = condition;
        let result = engine.evaluate(&input).expect("evaluates");
        assert!(
            result.breakdown.repairs >= previous,
            "{} lowered repairs",
            preset.label()
        );
        previous = result.breakdown.repairs;
    }
}

#[test]
fn structural_problems_never_raise_cash_net() {
    let engine = OfferEngine::new();
    let sound = engine.evaluate(&baseline_input()).expect("evaluates").cash_net;

    let mut cases = Vec::new();
    for foundation in FoundationCondition::ordered() {
        let mut input = baseline_input();
        input.condition.foundation = *foundation;
        cases.push((foundation.code(), input));
    }
    for basement in BasementCondition::ordered() {
        let mut input = baseline_input();
        input.condition.basement = *basement;
        cases.push((basement.code(), input));
    }
    for hazards in HazardCondition::ordered() {
        let mut input = baseline_input();
        input.condition.hazards = *hazards;
        cases.push((hazards.code(), input));
    }

    for (code, input) in cases {
        let cash = engine.evaluate(&input).expect("evaluates").cash_net;
        assert!(cash <= sound + CENTS, "{code} raised cash net to {cash}");
    }
}
