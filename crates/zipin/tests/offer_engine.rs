use chrono::NaiveDate;
use zipin::workflows::offer::domain::RoofCondition;
use zipin::workflows::offer::{
    ConditionPreset, OfferDefaults, OfferEngine, OfferForm, OfferLetterRenderer,
    OfferLetterTerms, PlainTextLetter, Recommendation, Selection, SignalSource,
    SyntheticSignalGenerator, ValidationError,
};

fn form() -> OfferForm {
    OfferForm {
        address: "4112 Bryant Ave S, Minneapolis, MN 55408".to_string(),
        as_is: "$300,000".to_string(),
        sqft: "1,600".to_string(),
        year_built: "1995".to_string(),
        ..OfferForm::default()
    }
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 0.01
}

#[test]
fn free_text_form_values_reach_the_engine() {
    let input = form().normalize(&OfferDefaults::default());
    assert_eq!(input.property.zip, "55408");
    assert_eq!(input.property.as_is_value, 300_000.0);
    assert_eq!(input.property.sqft, 1600);

    let result = OfferEngine::new().evaluate(&input).expect("form evaluates");
    assert!(close(result.cash_net, 258_500.0));
    assert!(close(result.partnership_net, 290_200.0));
    assert_eq!(result.recommendation, Recommendation::Partnership);
}

#[test]
fn unknown_codes_fall_back_to_best_condition() {
    let defaults = OfferDefaults::default();
    let sparkly = OfferForm {
        roof: "sparkly".to_string(),
        band: "aggressive".to_string(),
        ..form()
    }
    .normalize(&defaults);
    let plain = form().normalize(&defaults);

    assert_eq!(sparkly.condition.roof, RoofCondition::Ok);
    assert_eq!(sparkly, plain);
}

#[test]
fn explicit_fields_override_the_preset() {
    let defaults = OfferDefaults::default();
    let rough = OfferForm {
        preset: "rough".to_string(),
        ..form()
    }
    .normalize(&defaults);
    let rough_owner = OfferForm {
        preset: "rough".to_string(),
        occupancy: "owner".to_string(),
        roof: "ok".to_string(),
        ..form()
    }
    .normalize(&defaults);

    let (preset_condition, _) = ConditionPreset::Rough.selections();
    assert_eq!(rough.condition, preset_condition);
    assert_eq!(rough_owner.condition.roof, RoofCondition::Ok);
    assert_eq!(rough_owner.condition.kitchen, preset_condition.kitchen);

    let engine = OfferEngine::new();
    let rough = engine.evaluate(&rough).expect("rough evaluates");
    let rough_owner = engine.evaluate(&rough_owner).expect("override evaluates");
    assert!(rough_owner.breakdown.friction.dollars < rough.breakdown.friction.dollars);
    assert!(rough_owner.breakdown.repairs < rough.breakdown.repairs);
}

#[test]
fn every_preset_code_is_accepted() {
    for preset in ConditionPreset::ordered() {
        let input = OfferForm {
            preset: preset.code().to_string(),
            ..form()
        }
        .normalize(&OfferDefaults::default());
        assert_eq!(
            (input.condition, input.friction),
            preset.selections(),
            "{}",
            preset.label()
        );
    }
}

#[test]
fn synthetic_signal_shifts_both_offers() {
    let mut input = form().normalize(&OfferDefaults::default());
    let engine = OfferEngine::new();
    let without = engine.evaluate(&input).expect("evaluates");

    input.signal = SyntheticSignalGenerator.scan(&input.property.address, &input.property.zip);
    let with = engine.evaluate(&input).expect("evaluates");

    assert!(with.breakdown.cash_discount > without.breakdown.cash_discount);
    assert!(with.breakdown.service_rate > without.breakdown.service_rate);
    assert!(with.signal.notes.contains("Crime/Safety"));
    assert_eq!(without.signal.crime_score, 50);
}

#[test]
fn letter_presents_both_options() {
    let input = form().normalize(&OfferDefaults::default());
    let result = OfferEngine::new().evaluate(&input).expect("evaluates");
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");

    let terms = OfferLetterTerms::from_offer(&input.property, &result, date);
    assert_eq!(terms.state.as_deref(), Some("MN"));

    let letter = PlainTextLetter {
        buyer: "Northside Home Partners".to_string(),
    }
    .render(&terms)
    .expect("letter renders");

    assert!(letter.starts_with("June 1, 2025"));
    assert!(letter.contains("Market Focus: 55408 (MN)"));
    assert!(letter.contains("Option A - Guaranteed Cash: $258,500 net to seller, approximately 55 days"));
    assert!(letter.contains("Option B - Partnership / Novation: $290,200"));
    assert!(letter.contains("As-Is Value basis: $300,000."));
}

#[test]
fn missing_zip_is_a_validation_error() {
    let input = OfferForm {
        address: "123 Nowhere Rd".to_string(),
        as_is: "250000".to_string(),
        ..OfferForm::default()
    }
    .normalize(&OfferDefaults::default());

    assert!(matches!(
        OfferEngine::new().evaluate(&input),
        Err(ValidationError::InvalidZip { .. })
    ));
}
