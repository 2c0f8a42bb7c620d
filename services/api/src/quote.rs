use crate::infra::{parse_date, InMemoryDealMemory};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use zipin::config::AppConfig;
use zipin::error::AppError;
use zipin::workflows::comps::{CompsImporter, CompsStats};
use zipin::workflows::offer::{
    format_currency, OfferForm, OfferLetterRenderer, OfferLetterTerms, OfferService,
    PlainTextLetter, Quote, QuoteRequest, RepairCategory,
};

/// Intake fields accepted on the command line; every flag is free text and parsed leniently.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct QuoteArgs {
    /// Street address; a trailing ZIP is used when --zip is omitted
    #[arg(long)]
    pub(crate) address: Option<String>,
    #[arg(long)]
    pub(crate) zip: Option<String>,
    /// single_family, townhome, condo, or two_to_four_unit
    #[arg(long)]
    pub(crate) property_type: Option<String>,
    #[arg(long)]
    pub(crate) year_built: Option<String>,
    #[arg(long)]
    pub(crate) beds: Option<String>,
    #[arg(long)]
    pub(crate) baths: Option<String>,
    #[arg(long)]
    pub(crate) sqft: Option<String>,
    /// As-is value, e.g. "$300,000"; filled from comps when blank
    #[arg(long)]
    pub(crate) as_is: Option<String>,
    /// turnkey, dated, heavy, or rough; individual flags override it
    #[arg(long)]
    pub(crate) preset: Option<String>,
    #[arg(long)]
    pub(crate) roof: Option<String>,
    #[arg(long)]
    pub(crate) exterior: Option<String>,
    #[arg(long)]
    pub(crate) foundation: Option<String>,
    #[arg(long)]
    pub(crate) basement: Option<String>,
    #[arg(long)]
    pub(crate) hvac: Option<String>,
    #[arg(long)]
    pub(crate) electrical: Option<String>,
    #[arg(long)]
    pub(crate) plumbing: Option<String>,
    #[arg(long)]
    pub(crate) windows: Option<String>,
    #[arg(long)]
    pub(crate) kitchen: Option<String>,
    #[arg(long)]
    pub(crate) bathrooms_to_redo: Option<String>,
    #[arg(long)]
    pub(crate) flooring: Option<String>,
    #[arg(long)]
    pub(crate) hazards: Option<String>,
    #[arg(long)]
    pub(crate) hoa: Option<String>,
    #[arg(long)]
    pub(crate) occupancy: Option<String>,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) access: Option<String>,
    /// normal, fast, or rush
    #[arg(long)]
    pub(crate) timeline: Option<String>,
    /// conservative, likely, or stretch
    #[arg(long)]
    pub(crate) band: Option<String>,
    #[arg(long)]
    pub(crate) profit_split: Option<String>,
    #[arg(long)]
    pub(crate) service_rate_base: Option<String>,
    #[arg(long)]
    pub(crate) cash_discount_base: Option<String>,
    #[arg(long)]
    pub(crate) carry_per_day: Option<String>,
    /// Attach a synthetic hyperlocal signal for the ZIP or address
    #[arg(long)]
    pub(crate) scan_signals: bool,
    /// Comparable sales CSV (Address, Price, Sqft, Distance, Sale Date, Note)
    #[arg(long)]
    pub(crate) comps_csv: Option<PathBuf>,
    /// Reference date for comps recency and the letter (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print a plain-text letter of intent after the summary
    #[arg(long)]
    pub(crate) letter: bool,
    /// Buyer name used in the letter
    #[arg(long)]
    pub(crate) buyer: Option<String>,
}

impl QuoteArgs {
    pub(crate) fn form(&self) -> OfferForm {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        OfferForm {
            address: text(&self.address),
            zip: text(&self.zip),
            property_type: text(&self.property_type),
            year_built: text(&self.year_built),
            beds: text(&self.beds),
            baths: text(&self.baths),
            sqft: text(&self.sqft),
            as_is: text(&self.as_is),
            preset: text(&self.preset),
            roof: text(&self.roof),
            exterior: text(&self.exterior),
            foundation: text(&self.foundation),
            basement: text(&self.basement),
            hvac: text(&self.hvac),
            electrical: text(&self.electrical),
            plumbing: text(&self.plumbing),
            windows: text(&self.windows),
            kitchen: text(&self.kitchen),
            bathrooms_to_redo: text(&self.bathrooms_to_redo),
            flooring: text(&self.flooring),
            hazards: text(&self.hazards),
            hoa: text(&self.hoa),
            occupancy: text(&self.occupancy),
            title: text(&self.title),
            access: text(&self.access),
            timeline: text(&self.timeline),
            band: text(&self.band),
            profit_split: text(&self.profit_split),
            service_rate_base: text(&self.service_rate_base),
            cash_discount_base: text(&self.cash_discount_base),
            carry_per_day: text(&self.carry_per_day),
            signal: None,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct CompsArgs {
    /// Comparable sales CSV
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Subject property square footage
    #[arg(long)]
    pub(crate) subject_sqft: f64,
    #[arg(long, default_value = "likely")]
    pub(crate) band: String,
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Partnership net from an offer run, to calibrate the suggested offer
    #[arg(long)]
    pub(crate) partnership_net: Option<f64>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let memory = Arc::new(InMemoryDealMemory::with_capacity(
        config.offer.deal_memory_capacity,
    ));
    let service = OfferService::new(memory, config.offer);

    let comps = match &args.comps_csv {
        Some(path) => CompsImporter::from_path(path)?,
        None => Vec::new(),
    };
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let quote = service.quote(QuoteRequest {
        form: args.form(),
        comps,
        comps_as_of: Some(as_of),
        scan_signals: args.scan_signals,
    })?;

    println!("{}", render_quote(&quote));

    if args.letter {
        let terms = OfferLetterTerms::from_offer(&quote.input.property, &quote.result, as_of);
        let renderer = PlainTextLetter {
            buyer: args.buyer.unwrap_or_default(),
        };
        println!("\n{}", renderer.render(&terms)?);
    }

    Ok(())
}

pub(crate) fn run_comps(args: CompsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = OfferService::new(Arc::new(InMemoryDealMemory::default()), config.offer);

    let request = zipin::workflows::offer::CompsRequest {
        comps: CompsImporter::from_path(&args.csv)?,
        subject_sqft: args.subject_sqft,
        band: args.band,
        as_of: args.as_of,
        partnership_net: args.partnership_net,
    };

    match service.evaluate_comps(&request) {
        Some(stats) => println!("{}", render_comps(&stats)),
        None => println!(
            "No usable comps in {} (each needs a positive price and square footage)",
            args.csv.display()
        ),
    }
    Ok(())
}

pub(crate) fn render_quote(quote: &Quote) -> String {
    let property = &quote.input.property;
    let result = &quote.result;
    let breakdown = &result.breakdown;
    let market = &result.market;
    let mut out = String::new();

    let _ = writeln!(out, "Offer summary for {}", quote.deal_key);
    let _ = writeln!(
        out,
        "Property: {} | {} | built {} | {} sqft | as-is {}",
        if property.address.is_empty() {
            "(no address)"
        } else {
            property.address.as_str()
        },
        property.property_type.label(),
        property.year_built,
        property.sqft,
        format_currency(property.as_is_value)
    );
    let _ = writeln!(
        out,
        "Market {}: stability {}, demand {}, cost risk {}, friction risk {}",
        market.zip5,
        market.lesi.label(),
        market.bdi.label(),
        market.rci.label(),
        market.rfi.label()
    );
    let _ = writeln!(out, "{}", result.band.summary());

    let _ = writeln!(out, "\nRecommendation: {}", result.recommendation.headline());
    let _ = writeln!(out, "{}", result.recommendation.reason());
    let _ = writeln!(
        out,
        "- Cash: {} net, ~{} days",
        format_currency(result.cash_net),
        result.days_cash
    );
    let _ = writeln!(
        out,
        "- Partnership: {} net, ~{} days",
        format_currency(result.partnership_net),
        result.days_partnership
    );
    let _ = writeln!(
        out,
        "- Difference: {} ({:+.1}%), tilt {:.0}/100",
        format_currency(result.delta),
        result.delta_pct,
        result.tilt
    );

    let _ = writeln!(out, "\nBreakdown");
    let _ = writeln!(
        out,
        "- ARV {} (value add {:.1}%)",
        format_currency(breakdown.arv),
        breakdown.value_add_pct * 100.0
    );
    let _ = writeln!(
        out,
        "- Cash discount {:.1}%, service rate {:.1}%",
        breakdown.cash_discount * 100.0,
        breakdown.service_rate * 100.0
    );
    let _ = writeln!(
        out,
        "- Repairs {}, closing friction {}, carry {} over {:.0} days",
        format_currency(breakdown.repairs),
        format_currency(breakdown.closing_friction),
        format_currency(breakdown.carry),
        breakdown.carry_days
    );
    let _ = writeln!(
        out,
        "- Partnership anchor {} with floor {}",
        format_currency(breakdown.anchor),
        format_currency(breakdown.floor)
    );

    let estimate = &result.repair_estimate;
    let itemized: Vec<String> = estimate
        .lines
        .iter()
        .chain(estimate.fixed_deductions.iter())
        .filter(|line| line.cost > 0.0)
        .map(|line| format!("{} {}", line.category.label(), format_currency(line.cost)))
        .collect();
    if itemized.is_empty() {
        let _ = writeln!(out, "- Repair items: none");
    } else {
        let _ = writeln!(out, "- Repair items: {}", itemized.join(", "));
    }
    if estimate.line(RepairCategory::Roof) > 0.0 || estimate.line(RepairCategory::Flooring) > 0.0 {
        let _ = writeln!(out, "  (roof and flooring are priced per 100 sqft)");
    }

    if quote.input.signal.is_some() {
        let _ = writeln!(out, "- {}", result.signal.notes);
    }

    if let Some(stats) = &quote.comps {
        let _ = write!(out, "\n{}", render_comps(stats));
    }

    out.trim_end().to_string()
}

pub(crate) fn render_comps(stats: &CompsStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Comparable sales ({} used)", stats.comps_used);
    let _ = writeln!(
        out,
        "- Average {} | median {} | {:.0}/sqft weighted",
        format_currency(stats.avg_price),
        format_currency(stats.median_price),
        stats.weighted_price_per_area
    );
    let _ = writeln!(
        out,
        "- Suggested value {} (range {} to {})",
        format_currency(stats.subject_suggested_value),
        format_currency(stats.confidence_band.0),
        format_currency(stats.confidence_band.1)
    );
    let _ = write!(
        out,
        "- Suggested offer {} after a {:.1}% discount",
        format_currency(stats.suggested_offer),
        stats.discount * 100.0
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipin::workflows::offer::OfferDefaults;

    fn quote_for(args: &QuoteArgs) -> Quote {
        let service = OfferService::new(
            Arc::new(InMemoryDealMemory::default()),
            OfferDefaults::default(),
        );
        service
            .quote(QuoteRequest {
                form: args.form(),
                ..QuoteRequest::default()
            })
            .expect("quote succeeds")
    }

    #[test]
    fn flags_map_onto_form_fields() {
        let args = QuoteArgs {
            address: Some("4112 Bryant Ave S, Minneapolis, MN 55408".to_string()),
            as_is: Some("$300,000".to_string()),
            preset: Some("heavy".to_string()),
            kitchen: Some("serviceable".to_string()),
            ..QuoteArgs::default()
        };
        let form = args.form();
        assert_eq!(form.preset, "heavy");
        assert_eq!(form.kitchen, "serviceable");
        assert_eq!(form.zip, "");
        assert_eq!(form.resolved_zip(), "55408");
    }

    #[test]
    fn summary_lists_both_nets() {
        let args = QuoteArgs {
            zip: Some("55408".to_string()),
            as_is: Some("300000".to_string()),
            ..QuoteArgs::default()
        };
        let rendered = render_quote(&quote_for(&args));
        assert!(rendered.contains("Partnership (Novation)"));
        assert!(rendered.contains("- Cash: $258,500 net, ~55 days"));
        assert!(rendered.contains("- Partnership: $290,200 net, ~55 days"));
        assert!(rendered.contains("Repair items: none"));
    }

    #[test]
    fn summary_itemizes_repairs() {
        let args = QuoteArgs {
            zip: Some("78704".to_string()),
            as_is: Some("400000".to_string()),
            sqft: Some("2000".to_string()),
            year_built: Some("1960".to_string()),
            kitchen: Some("gut".to_string()),
            flooring: Some("full".to_string()),
            roof: Some("end".to_string()),
            ..QuoteArgs::default()
        };
        let rendered = render_quote(&quote_for(&args));
        assert!(rendered.contains("Kitchen $18,500"));
        assert!(rendered.contains("priced per 100 sqft"));
    }
}
