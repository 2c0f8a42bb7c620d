use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::domain::ComparableSale;
use crate::workflows::offer::normalizer::lenient_number;

#[derive(Debug)]
pub enum CompsImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CompsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompsImportError::Io(err) => write!(f, "failed to read comps file: {}", err),
            CompsImportError::Csv(err) => write!(f, "invalid comps CSV data: {}", err),
        }
    }
}

impl std::error::Error for CompsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompsImportError::Io(err) => Some(err),
            CompsImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CompsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CompsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads comparable sales from a CSV export.
///
/// Expected columns are `Address, Price, Sqft, Distance, Sale Date, Note`; headers are
/// matched case-insensitively and every column may be blank. Numbers are parsed leniently
/// (`$412,000` is fine) and dates use `YYYY-MM-DD`.
pub struct CompsImporter;

impl CompsImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ComparableSale>, CompsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ComparableSale>, CompsImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: csv::StringRecord = csv_reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_ascii_lowercase())
            .collect();
        csv_reader.set_headers(headers);

        let mut comps = Vec::new();
        for record in csv_reader.deserialize::<CompRow>() {
            let row = record?;
            comps.push(row.into_sale());
        }

        Ok(comps)
    }
}

#[derive(Debug, Deserialize)]
struct CompRow {
    #[serde(default, alias = "addr")]
    address: String,
    #[serde(default, alias = "sold price")]
    price: String,
    #[serde(default, alias = "sf", alias = "area")]
    sqft: String,
    #[serde(default, alias = "mi", alias = "miles")]
    distance: String,
    #[serde(
        rename = "sale date",
        alias = "date",
        alias = "sold date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    sale_date: Option<String>,
    #[serde(default)]
    note: String,
}

impl CompRow {
    fn into_sale(self) -> ComparableSale {
        ComparableSale {
            sale_date: self.sale_date.as_deref().and_then(parse_date),
            price: lenient_number(&self.price, 0.0),
            area_sqft: lenient_number(&self.sqft, 0.0),
            distance_miles: lenient_number(&self.distance, 0.0),
            address: self.address,
            note: self.note,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
