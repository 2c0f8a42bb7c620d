use crate::infra::{parse_date, InMemoryDealMemory};
use crate::quote::render_quote;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::io::Cursor;
use std::sync::Arc;
use zipin::error::AppError;
use zipin::workflows::comps::CompsImporter;
use zipin::workflows::offer::{
    format_currency, ConditionPreset, OfferDefaults, OfferForm, OfferLetterRenderer,
    OfferLetterTerms, OfferService, PlainTextLetter, QuoteRequest, ScenarioBand, Selection,
};

const DEMO_ADDRESS: &str = "4112 Bryant Ave S, Minneapolis, MN 55408";

const DEMO_COMPS: &str = "Address,Price,Sqft,Distance,Sale Date,Note\n\
4020 Colfax Ave S,\"$310,000\",1550,0.3,2025-03-01,updated kitchen\n\
3944 Aldrich Ave S,298000,1620,0.6,2025-01-15,needs paint\n\
4237 Dupont Ave S,335000,1780,0.9,2024-11-20,\n";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for comps recency and the letter (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Skip the letter of intent at the end of the demo
    #[arg(long)]
    pub(crate) skip_letter: bool,
}

fn demo_form(preset: ConditionPreset, band: ScenarioBand) -> OfferForm {
    OfferForm {
        address: DEMO_ADDRESS.to_string(),
        year_built: "1948".to_string(),
        beds: "3".to_string(),
        baths: "1.5".to_string(),
        sqft: "1640".to_string(),
        as_is: "$305,000".to_string(),
        preset: preset.code().to_string(),
        band: band.code().to_string(),
        ..OfferForm::default()
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let memory = Arc::new(InMemoryDealMemory::default());
    let service = OfferService::new(memory, OfferDefaults::default());

    println!("Offer valuation demo");
    println!("Subject: {DEMO_ADDRESS} (as-is $305,000, 1,640 sqft, built 1948)");

    println!("\nCondition presets across bands (cash / partnership)");
    for preset in ConditionPreset::ordered() {
        let mut cells = Vec::new();
        for band in ScenarioBand::ordered() {
            let quote = service.quote(QuoteRequest {
                form: demo_form(*preset, *band),
                ..QuoteRequest::default()
            })?;
            cells.push(format!(
                "{} {} / {}",
                band.label(),
                format_currency(quote.result.cash_net),
                format_currency(quote.result.partnership_net)
            ));
        }
        println!("- {}: {}", preset.label(), cells.join(" | "));
    }

    let comps = CompsImporter::from_reader(Cursor::new(DEMO_COMPS))?;
    let quote = service.quote(QuoteRequest {
        form: OfferForm {
            as_is: String::new(),
            ..demo_form(ConditionPreset::Dated, ScenarioBand::Likely)
        },
        comps,
        comps_as_of: Some(as_of),
        scan_signals: true,
    })?;

    println!("\nDated preset with comps-derived as-is value and a signal scan");
    println!("{}", render_quote(&quote));

    let deals = service.recent_deals()?;
    println!("\nDeal memory ({} saved)", deals.len());
    for deal in deals.iter().take(3) {
        println!(
            "- {} | {} | cash {} | partnership {} | {}",
            deal.key,
            deal.band.label(),
            format_currency(deal.cash_net),
            format_currency(deal.partnership_net),
            deal.leaning()
        );
    }

    if args.skip_letter {
        return Ok(());
    }

    let terms = OfferLetterTerms::from_offer(&quote.input.property, &quote.result, as_of);
    let letter = PlainTextLetter {
        buyer: "Northside Home Partners".to_string(),
    }
    .render(&terms)?;
    println!("\n{letter}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_comps_parse() {
        let comps = CompsImporter::from_reader(Cursor::new(DEMO_COMPS)).expect("demo comps parse");
        assert_eq!(comps.len(), 3);
        assert!(comps.iter().all(|comp| comp.is_valid()));
    }

    #[test]
    fn demo_runs_end_to_end() {
        let args = DemoArgs {
            as_of: NaiveDate::from_ymd_opt(2025, 6, 1),
            skip_letter: false,
        };
        run_demo(args).expect("demo completes");
    }
}
