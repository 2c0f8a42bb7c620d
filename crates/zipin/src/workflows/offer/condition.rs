use super::domain::{
    AccessStatus, BasementCondition, ConditionSelections, ElectricalCondition, ExteriorCondition,
    FlooringCondition, FoundationCondition, FrictionSelections, HazardCondition, HoaStatus,
    HvacCondition, KitchenCondition, Occupancy, PlumbingCondition, PropertyType, RoofCondition,
    Selection, TitleStatus, WindowCondition,
};
use serde::{Deserialize, Serialize};

/// Area-priced categories (roof, flooring) multiply their coefficient by `sqft * AREA_SCALE`.
pub const AREA_SCALE: f64 = 0.01;

const BATH_FIRST_UNIT: f64 = 6000.0;
const BATH_EACH_ADDITIONAL: f64 = 5000.0;
const WINDOW_MIXED_UNIT: f64 = 250.0;
const WINDOW_REPLACE_UNIT: f64 = 650.0;

impl RoofCondition {
    pub const fn cost_per_area(self) -> f64 {
        match self {
            Self::Ok => 0.0,
            Self::Aging => 3.5,
            Self::EndOfLife => 7.5,
            Self::ActiveLeak => 10.5,
        }
    }
}

impl ExteriorCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::Ok => 0.0,
            Self::PaintSiding => 5500.0,
            Self::MajorRepair => 16500.0,
        }
    }
}

impl FoundationCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::Sound => 0.0,
            Self::MinorSettling => 6500.0,
            Self::MajorStructural => 22000.0,
        }
    }
}

impl BasementCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::Dry => 0.0,
            Self::Damp => 2500.0,
            Self::PastFlooding => 9000.0,
            Self::Mold => 14000.0,
        }
    }
}

impl HvacCondition {
    /// Cost for a single system; multi-unit buildings carry two.
    pub const fn cost(self) -> f64 {
        match self {
            Self::Ok => 0.0,
            Self::Old => 5500.0,
            Self::Inoperable => 8500.0,
        }
    }
}

impl ElectricalCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::Modern => 0.0,
            Self::OldSafe => 3500.0,
            Self::FusesKnobTube => 500.0,
        }
    }
}

impl PlumbingCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::PexCopper => 0.0,
            Self::GalvanizedMix => 4500.0,
            Self::CastIronFailing => 12000.0,
        }
    }
}

impl KitchenCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::Serviceable => 0.0,
            Self::Dated => 8500.0,
            Self::Gut => 18500.0,
        }
    }
}

impl FlooringCondition {
    pub const fn cost_per_area(self) -> f64 {
        match self {
            Self::Ok => 0.0,
            Self::Patch => 3.5,
            Self::Full => 6.5,
        }
    }
}

impl HazardCondition {
    pub const fn cost(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::AsbestosLead => 7500.0,
            Self::MethHoarder => 18500.0,
        }
    }
}

/// Window openings priced for replacement, tiered by living area.
pub fn window_unit_count(sqft: u32) -> u32 {
    if sqft < 1200 {
        8
    } else if sqft < 2200 {
        12
    } else {
        16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairCategory {
    Roof,
    Exterior,
    Foundation,
    Basement,
    Hvac,
    Electrical,
    Plumbing,
    Windows,
    Kitchen,
    Bathrooms,
    Flooring,
    Hazards,
}

impl RepairCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Roof => "Roof",
            Self::Exterior => "Exterior",
            Self::Foundation => "Foundation",
            Self::Basement => "Basement/Water",
            Self::Hvac => "HVAC",
            Self::Electrical => "Electrical",
            Self::Plumbing => "Plumbing",
            Self::Windows => "Windows",
            Self::Kitchen => "Kitchen",
            Self::Bathrooms => "Bathrooms",
            Self::Flooring => "Flooring",
            Self::Hazards => "Hazards",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepairLine {
    pub category: RepairCategory,
    pub cost: f64,
}

/// Itemized repair estimate before scenario-band scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairEstimate {
    pub lines: Vec<RepairLine>,
    /// Flat deductions for severe selections, on top of the table cost.
    pub fixed_deductions: Vec<RepairLine>,
    pub total: f64,
}

impl RepairEstimate {
    pub fn line(&self, category: RepairCategory) -> f64 {
        self.lines
            .iter()
            .find(|line| line.category == category)
            .map(|line| line.cost)
            .unwrap_or(0.0)
    }

    pub fn fixed_total(&self) -> f64 {
        self.fixed_deductions.iter().map(|line| line.cost).sum()
    }
}

pub fn estimate_repairs(
    property_type: PropertyType,
    sqft: u32,
    condition: &ConditionSelections,
) -> RepairEstimate {
    let area = f64::from(sqft) * AREA_SCALE;
    let is_condo = property_type == PropertyType::Condo;
    let hvac_systems = if property_type == PropertyType::TwoToFourUnit {
        2.0
    } else {
        1.0
    };

    let roof = if is_condo {
        0.0
    } else {
        condition.roof.cost_per_area() * area
    };

    let window_units = f64::from(window_unit_count(sqft));
    let windows = match (is_condo, condition.windows) {
        (true, _) | (false, WindowCondition::Ok) => 0.0,
        (false, WindowCondition::Mixed) => WINDOW_MIXED_UNIT * window_units / 2.0,
        (false, WindowCondition::MostlyReplace) => WINDOW_REPLACE_UNIT * window_units,
    };

    let bathrooms = match condition.bathrooms_to_redo.min(3) {
        0 => 0.0,
        count => BATH_FIRST_UNIT + f64::from(count - 1) * BATH_EACH_ADDITIONAL,
    };

    let lines = vec![
        RepairLine {
            category: RepairCategory::Roof,
            cost: roof,
        },
        RepairLine {
            category: RepairCategory::Exterior,
            cost: condition.exterior.cost(),
        },
        RepairLine {
            category: RepairCategory::Foundation,
            cost: condition.foundation.cost(),
        },
        RepairLine {
            category: RepairCategory::Basement,
            cost: condition.basement.cost(),
        },
        RepairLine {
            category: RepairCategory::Hvac,
            cost: condition.hvac.cost() * hvac_systems,
        },
        RepairLine {
            category: RepairCategory::Electrical,
            cost: condition.electrical.cost(),
        },
        RepairLine {
            category: RepairCategory::Plumbing,
            cost: condition.plumbing.cost(),
        },
        RepairLine {
            category: RepairCategory::Windows,
            cost: windows,
        },
        RepairLine {
            category: RepairCategory::Kitchen,
            cost: condition.kitchen.cost(),
        },
        RepairLine {
            category: RepairCategory::Bathrooms,
            cost: bathrooms,
        },
        RepairLine {
            category: RepairCategory::Flooring,
            cost: condition.flooring.cost_per_area() * area,
        },
        RepairLine {
            category: RepairCategory::Hazards,
            cost: condition.hazards.cost(),
        },
    ];

    let fixed_deductions = severe_deductions(condition);
    let total = lines.iter().map(|line| line.cost).sum::<f64>()
        + fixed_deductions.iter().map(|line| line.cost).sum::<f64>();

    RepairEstimate {
        lines,
        fixed_deductions,
        total,
    }
}

fn severe_deductions(condition: &ConditionSelections) -> Vec<RepairLine> {
    let candidates = [
        (
            condition.hvac == HvacCondition::Inoperable,
            RepairCategory::Hvac,
            5000.0,
        ),
        (
            condition.roof == RoofCondition::ActiveLeak,
            RepairCategory::Roof,
            3000.0,
        ),
        (
            condition.foundation == FoundationCondition::MajorStructural,
            RepairCategory::Foundation,
            15000.0,
        ),
        (
            condition.exterior == ExteriorCondition::MajorRepair,
            RepairCategory::Exterior,
            5000.0,
        ),
        (
            condition.kitchen == KitchenCondition::Gut,
            RepairCategory::Kitchen,
            2000.0,
        ),
    ];

    candidates
        .into_iter()
        .filter(|(applies, _, _)| *applies)
        .map(|(_, category, cost)| RepairLine { category, cost })
        .collect()
}

/// Finish-level weight (kitchen + flooring) feeding the value-add curve.
pub fn cosmetic_weight(condition: &ConditionSelections) -> f64 {
    let kitchen = match condition.kitchen {
        KitchenCondition::Serviceable => 0.2,
        KitchenCondition::Dated => 0.5,
        KitchenCondition::Gut => 0.8,
    };
    let flooring = match condition.flooring {
        FlooringCondition::Ok => 0.1,
        FlooringCondition::Patch => 0.4,
        FlooringCondition::Full => 0.7,
    };
    kitchen + flooring
}

/// Structural/system weight (roof, foundation, electrical, plumbing).
pub fn heavy_weight(condition: &ConditionSelections) -> f64 {
    let roof = match condition.roof {
        RoofCondition::EndOfLife | RoofCondition::ActiveLeak => 0.5,
        _ => 0.0,
    };
    let foundation = match condition.foundation {
        FoundationCondition::MajorStructural => 0.8,
        FoundationCondition::MinorSettling => 0.3,
        FoundationCondition::Sound => 0.0,
    };
    let electrical = if condition.electrical == ElectricalCondition::FusesKnobTube {
        0.4
    } else {
        0.0
    };
    let plumbing = if condition.plumbing == PlumbingCondition::CastIronFailing {
        0.3
    } else {
        0.0
    };
    roof + foundation + electrical + plumbing
}

/// Canned checklists for common property states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionPreset {
    #[default]
    Turnkey,
    Dated,
    Heavy,
    Rough,
}

impl Selection for ConditionPreset {
    const FIELD: &'static str = "preset";

    fn ordered() -> &'static [Self] {
        &[Self::Turnkey, Self::Dated, Self::Heavy, Self::Rough]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Turnkey => "turnkey",
            Self::Dated => "dated",
            Self::Heavy => "heavy",
            Self::Rough => "rough",
        }
    }
}

impl ConditionPreset {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Turnkey => "Turnkey / Retail Ready",
            Self::Dated => "Dated but Livable",
            Self::Heavy => "Heavy Fixer",
            Self::Rough => "Rough / Squatter Risk",
        }
    }

    pub fn selections(self) -> (ConditionSelections, FrictionSelections) {
        match self {
            Self::Turnkey => (ConditionSelections::default(), FrictionSelections::default()),
            Self::Dated => (
                ConditionSelections {
                    roof: RoofCondition::Aging,
                    exterior: ExteriorCondition::PaintSiding,
                    foundation: FoundationCondition::Sound,
                    basement: BasementCondition::Damp,
                    hvac: HvacCondition::Old,
                    electrical: ElectricalCondition::OldSafe,
                    plumbing: PlumbingCondition::GalvanizedMix,
                    windows: WindowCondition::Mixed,
                    kitchen: KitchenCondition::Dated,
                    bathrooms_to_redo: 1,
                    flooring: FlooringCondition::Patch,
                    hazards: HazardCondition::None,
                },
                FrictionSelections::default(),
            ),
            Self::Heavy => (
                ConditionSelections {
                    roof: RoofCondition::EndOfLife,
                    exterior: ExteriorCondition::MajorRepair,
                    foundation: FoundationCondition::MinorSettling,
                    basement: BasementCondition::PastFlooding,
                    hvac: HvacCondition::Old,
                    electrical: ElectricalCondition::OldSafe,
                    plumbing: PlumbingCondition::CastIronFailing,
                    windows: WindowCondition::MostlyReplace,
                    kitchen: KitchenCondition::Gut,
                    bathrooms_to_redo: 2,
                    flooring: FlooringCondition::Full,
                    hazards: HazardCondition::AsbestosLead,
                },
                FrictionSelections {
                    hoa: HoaStatus::No,
                    occupancy: Occupancy::Vacant,
                    title: TitleStatus::Liens,
                    access: AccessStatus::Limited,
                },
            ),
            Self::Rough => (
                ConditionSelections {
                    roof: RoofCondition::ActiveLeak,
                    exterior: ExteriorCondition::MajorRepair,
                    foundation: FoundationCondition::MajorStructural,
                    basement: BasementCondition::Mold,
                    hvac: HvacCondition::Inoperable,
                    electrical: ElectricalCondition::FusesKnobTube,
                    plumbing: PlumbingCondition::CastIronFailing,
                    windows: WindowCondition::MostlyReplace,
                    kitchen: KitchenCondition::Gut,
                    bathrooms_to_redo: 3,
                    flooring: FlooringCondition::Full,
                    hazards: HazardCondition::MethHoarder,
                },
                FrictionSelections {
                    hoa: HoaStatus::No,
                    occupancy: Occupancy::Squatter,
                    title: TitleStatus::PreForeclosure,
                    access: AccessStatus::Blocked,
                },
            ),
        }
    }
}
