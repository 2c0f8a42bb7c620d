use super::calculator::OfferResult;
use super::domain::PropertyProfile;
use super::normalizer::parse_state_from_address;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Economic terms presented in a non-binding letter of intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferLetterTerms {
    pub date: NaiveDate,
    pub address: String,
    pub zip: String,
    pub state: Option<String>,
    pub as_is_value: f64,
    pub cash_net: f64,
    /// Present only when positive and distinct from the cash net.
    pub partnership_net: Option<f64>,
    pub band_label: String,
    pub days_cash: u32,
    pub days_partnership: u32,
}

impl OfferLetterTerms {
    pub fn from_offer(profile: &PropertyProfile, result: &OfferResult, date: NaiveDate) -> Self {
        let address = if profile.address.trim().is_empty() {
            format!("Property in ZIP {}", profile.zip)
        } else {
            profile.address.trim().to_string()
        };

        let partnership_net = Some(result.partnership_net)
            .filter(|net| *net > 0.0 && (*net - result.cash_net).abs() > f64::EPSILON);

        Self {
            date,
            state: parse_state_from_address(&profile.address),
            address,
            zip: profile.zip.clone(),
            as_is_value: profile.as_is_value,
            cash_net: result.cash_net,
            partnership_net,
            band_label: result.band.label().to_string(),
            days_cash: result.days_cash,
            days_partnership: result.days_partnership,
        }
    }
}

/// Turns letter terms into a finished document.
pub trait OfferLetterRenderer {
    fn render(&self, terms: &OfferLetterTerms) -> Result<String, LetterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LetterError {
    #[error("no positive net to present for {address}")]
    NothingToOffer { address: String },
    #[error("letter formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// Whole-dollar currency with thousands separators, e.g. `$258,500` or `-$500`.
pub fn format_currency(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Plain-text letter suitable for email bodies and terminals.
#[derive(Debug, Clone, Default)]
pub struct PlainTextLetter {
    pub buyer: String,
}

impl OfferLetterRenderer for PlainTextLetter {
    fn render(&self, terms: &OfferLetterTerms) -> Result<String, LetterError> {
        if terms.cash_net <= 0.0 && terms.partnership_net.is_none() {
            return Err(LetterError::NothingToOffer {
                address: terms.address.clone(),
            });
        }

        let buyer = if self.buyer.trim().is_empty() {
            "Buyer"
        } else {
            self.buyer.trim()
        };

        let mut out = String::new();
        writeln!(out, "{}", terms.date.format("%B %-d, %Y"))?;
        match &terms.state {
            Some(state) => writeln!(out, "Market Focus: {} ({state})", terms.zip)?,
            None => writeln!(out, "Market Focus: {}", terms.zip)?,
        }
        writeln!(out, "Scenario Band: {}", terms.band_label)?;
        writeln!(out)?;
        writeln!(out, "Re: Non-Binding Letter of Intent to Purchase")?;
        writeln!(out, "Property: {}", terms.address)?;
        writeln!(out)?;
        writeln!(
            out,
            "{buyer} is prepared to purchase the property on the terms below, subject to a formal purchase agreement, final inspection, and standard due diligence."
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Option A - Guaranteed Cash: {} net to seller, approximately {} days from clear title.",
            format_currency(terms.cash_net),
            terms.days_cash
        )?;
        if let Some(net) = terms.partnership_net {
            writeln!(
                out,
                "Option B - Partnership / Novation: {} net to seller, approximately {} days from clear title and project start.",
                format_currency(net),
                terms.days_partnership
            )?;
        }
        writeln!(out)?;
        write!(
            out,
            "As-Is Value basis: {}. This is not a formal appraisal.",
            format_currency(terms.as_is_value)
        )?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> OfferLetterTerms {
        OfferLetterTerms {
            date: NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date"),
            address: "4112 Bryant Ave S, Minneapolis, MN 55408".to_string(),
            zip: "55408".to_string(),
            state: Some("MN".to_string()),
            as_is_value: 300_000.0,
            cash_net: 258_500.0,
            partnership_net: Some(290_200.0),
            band_label: "Likely".to_string(),
            days_cash: 55,
            days_partnership: 55,
        }
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(258_500.0), "$258,500");
        assert_eq!(format_currency(999.5), "$1,000");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(-500.0), "-$500");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(f64::NAN), "$0");
    }

    #[test]
    fn plain_text_lists_both_options() {
        let letter = PlainTextLetter {
            buyer: "Local Home Buyers".to_string(),
        }
        .render(&terms())
        .expect("letter renders");

        assert!(letter.starts_with("March 7, 2025"));
        assert!(letter.contains("Market Focus: 55408 (MN)"));
        assert!(letter.contains("Option A - Guaranteed Cash: $258,500"));
        assert!(letter.contains("Option B - Partnership / Novation: $290,200"));
        assert!(letter.contains("Local Home Buyers is prepared"));
    }

    #[test]
    fn cash_only_letter_omits_partnership() {
        let mut terms = terms();
        terms.partnership_net = None;
        let letter = PlainTextLetter::default()
            .render(&terms)
            .expect("letter renders");
        assert!(!letter.contains("Option B"));
        assert!(letter.contains("Buyer is prepared"));
    }

    #[test]
    fn refuses_letter_without_positive_net() {
        let mut terms = terms();
        terms.cash_net = -100.0;
        terms.partnership_net = None;
        match PlainTextLetter::default().render(&terms) {
            Err(LetterError::NothingToOffer { address }) => {
                assert!(address.starts_with("4112 Bryant"))
            }
            other => panic!("expected nothing-to-offer error, got {other:?}"),
        }
    }
}
