use super::domain::{OfferAssumptions, ScenarioBand};
use serde::{Deserialize, Serialize};

/// Run-independent defaults applied when a form leaves a value blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDefaults {
    pub assumptions: OfferAssumptions,
    pub band: ScenarioBand,
    /// Number of recent deals kept in memory.
    pub deal_memory_capacity: usize,
}

impl Default for OfferDefaults {
    fn default() -> Self {
        Self {
            assumptions: OfferAssumptions::default(),
            band: ScenarioBand::Likely,
            deal_memory_capacity: 20,
        }
    }
}
