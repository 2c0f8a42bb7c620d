//! Comparable sales: import, weighting, and offer calibration.

pub mod aggregator;
pub mod domain;
mod import;

pub use aggregator::{aggregate, comp_weight};
pub use domain::{ComparableSale, CompsContext, CompsStats};
pub use import::{CompsImportError, CompsImporter};
