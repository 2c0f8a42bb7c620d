use serde::{Deserialize, Serialize};

/// Enumerated checklist value that can be parsed from a free-form code.
///
/// Codes are matched case-insensitively with `-` and spaces folded to `_`, so both
/// `"active-leak"` and the short form `"leak"` resolve to [`RoofCondition::ActiveLeak`].
pub trait Selection: Copy + Default + PartialEq + 'static {
    /// Field name used in logs when a code cannot be resolved.
    const FIELD: &'static str;

    fn ordered() -> &'static [Self];

    fn code(self) -> &'static str;

    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    fn from_code(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if wanted.is_empty() {
            return None;
        }

        Self::ordered()
            .iter()
            .copied()
            .find(|option| option.code() == wanted || option.aliases().contains(&wanted.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    #[serde(alias = "sf")]
    SingleFamily,
    #[serde(alias = "th")]
    Townhome,
    Condo,
    #[serde(alias = "2to4")]
    TwoToFourUnit,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleFamily => "Single-Family",
            Self::Townhome => "Townhome",
            Self::Condo => "Condo",
            Self::TwoToFourUnit => "2-4 Units",
        }
    }
}

impl Selection for PropertyType {
    const FIELD: &'static str = "property_type";

    fn ordered() -> &'static [Self] {
        &[
            Self::SingleFamily,
            Self::Townhome,
            Self::Condo,
            Self::TwoToFourUnit,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::SingleFamily => "single_family",
            Self::Townhome => "townhome",
            Self::Condo => "condo",
            Self::TwoToFourUnit => "two_to_four_unit",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::SingleFamily => &["sf"],
            Self::Townhome => &["th"],
            Self::Condo => &[],
            Self::TwoToFourUnit => &["2to4", "2_to_4_unit", "multi_unit"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofCondition {
    #[default]
    Ok,
    Aging,
    #[serde(alias = "end")]
    EndOfLife,
    #[serde(alias = "leak")]
    ActiveLeak,
}

impl Selection for RoofCondition {
    const FIELD: &'static str = "roof";

    fn ordered() -> &'static [Self] {
        &[Self::Ok, Self::Aging, Self::EndOfLife, Self::ActiveLeak]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Aging => "aging",
            Self::EndOfLife => "end_of_life",
            Self::ActiveLeak => "active_leak",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::EndOfLife => &["end"],
            Self::ActiveLeak => &["leak"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExteriorCondition {
    #[default]
    Ok,
    #[serde(alias = "paint")]
    PaintSiding,
    #[serde(alias = "major")]
    MajorRepair,
}

impl Selection for ExteriorCondition {
    const FIELD: &'static str = "exterior";

    fn ordered() -> &'static [Self] {
        &[Self::Ok, Self::PaintSiding, Self::MajorRepair]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::PaintSiding => "paint_siding",
            Self::MajorRepair => "major_repair",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::PaintSiding => &["paint"],
            Self::MajorRepair => &["major"],
            Self::Ok => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundationCondition {
    #[default]
    Sound,
    #[serde(alias = "settle")]
    MinorSettling,
    #[serde(alias = "struct")]
    MajorStructural,
}

impl Selection for FoundationCondition {
    const FIELD: &'static str = "foundation";

    fn ordered() -> &'static [Self] {
        &[Self::Sound, Self::MinorSettling, Self::MajorStructural]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Sound => "sound",
            Self::MinorSettling => "minor_settling",
            Self::MajorStructural => "major_structural",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MinorSettling => &["settle"],
            Self::MajorStructural => &["struct"],
            Self::Sound => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasementCondition {
    #[default]
    Dry,
    Damp,
    #[serde(alias = "flood")]
    PastFlooding,
    Mold,
}

impl Selection for BasementCondition {
    const FIELD: &'static str = "basement";

    fn ordered() -> &'static [Self] {
        &[Self::Dry, Self::Damp, Self::PastFlooding, Self::Mold]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Damp => "damp",
            Self::PastFlooding => "past_flooding",
            Self::Mold => "mold",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::PastFlooding => &["flood"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacCondition {
    #[default]
    Ok,
    Old,
    #[serde(alias = "fail")]
    Inoperable,
}

impl Selection for HvacCondition {
    const FIELD: &'static str = "hvac";

    fn ordered() -> &'static [Self] {
        &[Self::Ok, Self::Old, Self::Inoperable]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Old => "old",
            Self::Inoperable => "inoperable",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Inoperable => &["fail"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricalCondition {
    #[default]
    Modern,
    #[serde(alias = "old")]
    OldSafe,
    #[serde(alias = "fuse")]
    FusesKnobTube,
}

impl Selection for ElectricalCondition {
    const FIELD: &'static str = "electrical";

    fn ordered() -> &'static [Self] {
        &[Self::Modern, Self::OldSafe, Self::FusesKnobTube]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::OldSafe => "old_safe",
            Self::FusesKnobTube => "fuses_knob_tube",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::OldSafe => &["old"],
            Self::FusesKnobTube => &["fuse"],
            Self::Modern => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlumbingCondition {
    #[default]
    PexCopper,
    #[serde(alias = "galv_mix")]
    GalvanizedMix,
    #[serde(alias = "cast_fail")]
    CastIronFailing,
}

impl Selection for PlumbingCondition {
    const FIELD: &'static str = "plumbing";

    fn ordered() -> &'static [Self] {
        &[Self::PexCopper, Self::GalvanizedMix, Self::CastIronFailing]
    }

    fn code(self) -> &'static str {
        match self {
            Self::PexCopper => "pex_copper",
            Self::GalvanizedMix => "galvanized_mix",
            Self::CastIronFailing => "cast_iron_failing",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::GalvanizedMix => &["galv_mix"],
            Self::CastIronFailing => &["cast_fail"],
            Self::PexCopper => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowCondition {
    #[default]
    Ok,
    #[serde(alias = "mix")]
    Mixed,
    #[serde(alias = "replace")]
    MostlyReplace,
}

impl Selection for WindowCondition {
    const FIELD: &'static str = "windows";

    fn ordered() -> &'static [Self] {
        &[Self::Ok, Self::Mixed, Self::MostlyReplace]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Mixed => "mixed",
            Self::MostlyReplace => "mostly_replace",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Mixed => &["mix"],
            Self::MostlyReplace => &["replace"],
            Self::Ok => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenCondition {
    #[default]
    Serviceable,
    Dated,
    Gut,
}

impl Selection for KitchenCondition {
    const FIELD: &'static str = "kitchen";

    fn ordered() -> &'static [Self] {
        &[Self::Serviceable, Self::Dated, Self::Gut]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Serviceable => "serviceable",
            Self::Dated => "dated",
            Self::Gut => "gut",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlooringCondition {
    #[default]
    Ok,
    Patch,
    Full,
}

impl Selection for FlooringCondition {
    const FIELD: &'static str = "flooring";

    fn ordered() -> &'static [Self] {
        &[Self::Ok, Self::Patch, Self::Full]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Patch => "patch",
            Self::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCondition {
    #[default]
    None,
    #[serde(alias = "asbestos")]
    AsbestosLead,
    #[serde(alias = "meth")]
    MethHoarder,
}

impl Selection for HazardCondition {
    const FIELD: &'static str = "hazards";

    fn ordered() -> &'static [Self] {
        &[Self::None, Self::AsbestosLead, Self::MethHoarder]
    }

    fn code(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AsbestosLead => "asbestos_lead",
            Self::MethHoarder => "meth_hoarder",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::AsbestosLead => &["asbestos"],
            Self::MethHoarder => &["meth"],
            Self::None => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoaStatus {
    #[default]
    No,
    Yes,
}

impl Selection for HoaStatus {
    const FIELD: &'static str = "hoa";

    fn ordered() -> &'static [Self] {
        &[Self::No, Self::Yes]
    }

    fn code(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Owner,
    Tenant,
    Vacant,
    #[serde(alias = "squat")]
    Squatter,
}

impl Selection for Occupancy {
    const FIELD: &'static str = "occupancy";

    fn ordered() -> &'static [Self] {
        &[Self::Owner, Self::Tenant, Self::Vacant, Self::Squatter]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Tenant => "tenant",
            Self::Vacant => "vacant",
            Self::Squatter => "squatter",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Squatter => &["squat"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStatus {
    #[default]
    Clean,
    Liens,
    Probate,
    #[serde(alias = "foreclosure")]
    PreForeclosure,
}

impl Selection for TitleStatus {
    const FIELD: &'static str = "title";

    fn ordered() -> &'static [Self] {
        &[Self::Clean, Self::Liens, Self::Probate, Self::PreForeclosure]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Liens => "liens",
            Self::Probate => "probate",
            Self::PreForeclosure => "pre_foreclosure",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::PreForeclosure => &["foreclosure"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStatus {
    #[default]
    Easy,
    Limited,
    Blocked,
}

impl Selection for AccessStatus {
    const FIELD: &'static str = "access";

    fn ordered() -> &'static [Self] {
        &[Self::Easy, Self::Limited, Self::Blocked]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Limited => "limited",
            Self::Blocked => "blocked",
        }
    }
}

/// How quickly the seller needs to close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineUrgency {
    #[default]
    Normal,
    Fast,
    Rush,
}

impl Selection for TimelineUrgency {
    const FIELD: &'static str = "timeline";

    fn ordered() -> &'static [Self] {
        &[Self::Normal, Self::Fast, Self::Rush]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Rush => "rush",
        }
    }
}

/// Valuation stance applied to every engine term in tandem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioBand {
    Conservative,
    #[default]
    Likely,
    Stretch,
}

impl ScenarioBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Likely => "Likely",
            Self::Stretch => "Stretch",
        }
    }
}

impl Selection for ScenarioBand {
    const FIELD: &'static str = "band";

    fn ordered() -> &'static [Self] {
        &[Self::Conservative, Self::Likely, Self::Stretch]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Likely => "likely",
            Self::Stretch => "stretch",
        }
    }
}

/// Subject property as captured on the intake form, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyProfile {
    pub address: String,
    pub zip: String,
    pub property_type: PropertyType,
    pub year_built: u16,
    pub beds: u8,
    pub baths: f64,
    pub sqft: u32,
    pub as_is_value: f64,
}

/// Repair-relevant checklist; every field defaults to the best condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSelections {
    pub roof: RoofCondition,
    pub exterior: ExteriorCondition,
    pub foundation: FoundationCondition,
    pub basement: BasementCondition,
    pub hvac: HvacCondition,
    pub electrical: ElectricalCondition,
    pub plumbing: PlumbingCondition,
    pub windows: WindowCondition,
    pub kitchen: KitchenCondition,
    /// Bathrooms needing a full redo; anything above three is priced as three.
    pub bathrooms_to_redo: u8,
    pub flooring: FlooringCondition,
    pub hazards: HazardCondition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionSelections {
    pub hoa: HoaStatus,
    pub occupancy: Occupancy,
    pub title: TitleStatus,
    pub access: AccessStatus,
}

/// Optional synthetic risk scores, each expected in `[0, 1]`.
///
/// A missing or non-numeric score counts as the neutral midpoint `0.5` once a signal is
/// present; no signal at all yields a zero adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperlocalSignal {
    pub crime_index: Option<f64>,
    pub school_index: Option<f64>,
    pub flood_risk: Option<f64>,
    pub wildfire_risk: Option<f64>,
    pub review_delta: Option<f64>,
}

/// Named numeric overrides that tune the engine per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferAssumptions {
    pub profit_split: f64,
    pub service_rate_base: f64,
    pub cash_discount_base: f64,
    pub carry_per_day: f64,
    /// Calendar year property age is measured against.
    pub reference_year: u16,
}

impl Default for OfferAssumptions {
    fn default() -> Self {
        Self {
            profit_split: 0.5,
            service_rate_base: 0.032,
            cash_discount_base: 0.10,
            carry_per_day: 0.00026,
            reference_year: 2025,
        }
    }
}

impl OfferAssumptions {
    /// Replaces any non-finite rate with its default so clamps downstream stay meaningful.
    pub fn finite_or_default(&self) -> Self {
        let fallback = Self::default();
        let pick = |value: f64, default: f64| if value.is_finite() { value } else { default };
        Self {
            profit_split: pick(self.profit_split, fallback.profit_split),
            service_rate_base: pick(self.service_rate_base, fallback.service_rate_base),
            cash_discount_base: pick(self.cash_discount_base, fallback.cash_discount_base),
            carry_per_day: pick(self.carry_per_day, fallback.carry_per_day),
            reference_year: self.reference_year,
        }
    }
}

/// Immutable snapshot consumed by a single engine pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferInput {
    pub property: PropertyProfile,
    pub condition: ConditionSelections,
    pub friction: FrictionSelections,
    pub timeline: TimelineUrgency,
    pub band: ScenarioBand,
    pub signal: Option<HyperlocalSignal>,
    pub assumptions: OfferAssumptions,
}

/// Rejections that abort a run before any result is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{value}' is not a valid ZIP (expected 5 digits or ZIP+4)")]
    InvalidZip { value: String },
    #[error("as-is value must be positive (got {value})")]
    NonPositiveAsIs { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_codes_accept_short_forms_and_separators() {
        assert_eq!(
            RoofCondition::from_code("Active-Leak"),
            Some(RoofCondition::ActiveLeak)
        );
        assert_eq!(RoofCondition::from_code("leak"), Some(RoofCondition::ActiveLeak));
        assert_eq!(
            PropertyType::from_code("2to4"),
            Some(PropertyType::TwoToFourUnit)
        );
        assert_eq!(
            PropertyType::from_code("2-to-4 unit"),
            Some(PropertyType::TwoToFourUnit)
        );
        assert_eq!(TitleStatus::from_code("foreclosure"), Some(TitleStatus::PreForeclosure));
        assert_eq!(HvacCondition::from_code("  "), None);
        assert_eq!(HvacCondition::from_code("broken"), None);
    }

    #[test]
    fn every_code_round_trips_through_from_code() {
        for option in Occupancy::ordered() {
            assert_eq!(Occupancy::from_code(option.code()), Some(*option));
        }
        for option in ScenarioBand::ordered() {
            assert_eq!(ScenarioBand::from_code(option.code()), Some(*option));
        }
    }

    #[test]
    fn serde_accepts_original_short_codes() {
        let selections: ConditionSelections = serde_json::from_str(
            r#"{"roof":"leak","foundation":"struct","hvac":"fail","plumbing":"cast_fail"}"#,
        )
        .expect("selections parse");
        assert_eq!(selections.roof, RoofCondition::ActiveLeak);
        assert_eq!(selections.foundation, FoundationCondition::MajorStructural);
        assert_eq!(selections.hvac, HvacCondition::Inoperable);
        assert_eq!(selections.plumbing, PlumbingCondition::CastIronFailing);
        assert_eq!(selections.kitchen, KitchenCondition::Serviceable);
    }
}
