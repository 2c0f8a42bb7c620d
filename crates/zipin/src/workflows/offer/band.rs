use super::domain::ScenarioBand;
use serde::Serialize;

/// Multipliers and offsets a scenario band applies to the calculator's intermediate terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandProfile {
    /// Scales the value-add percentage.
    pub rvi: f64,
    pub repairs: f64,
    pub carry: f64,
    /// Offset added to the cash discount before clamping.
    pub cash: f64,
    /// Offset added to the service rate before clamping.
    pub svc: f64,
    pub svc_clamp: (f64, f64),
    /// Partnership floor as a fraction of the anchor.
    pub prox: f64,
}

/// Service rates never clamp below this ceiling regardless of band.
pub const SERVICE_RATE_CEILING_FLOOR: f64 = 0.09;

impl BandProfile {
    /// Effective `[lo, hi]` for the service rate; the upper bound is at least
    /// [`SERVICE_RATE_CEILING_FLOOR`].
    pub fn service_rate_bounds(&self) -> (f64, f64) {
        let (lo, hi) = self.svc_clamp;
        (lo, hi.max(SERVICE_RATE_CEILING_FLOOR))
    }
}

impl ScenarioBand {
    pub const fn profile(self) -> BandProfile {
        match self {
            Self::Conservative => BandProfile {
                rvi: 0.88,
                repairs: 1.12,
                carry: 1.12,
                cash: 0.015,
                svc: 0.008,
                svc_clamp: (0.03, 0.08),
                prox: 0.95,
            },
            Self::Likely => BandProfile {
                rvi: 1.0,
                repairs: 1.0,
                carry: 1.0,
                cash: 0.0,
                svc: 0.0,
                svc_clamp: (0.02, 0.05),
                prox: 0.97,
            },
            Self::Stretch => BandProfile {
                rvi: 1.08,
                repairs: 0.92,
                carry: 0.92,
                cash: -0.01,
                svc: -0.006,
                svc_clamp: (0.015, 0.04),
                prox: 0.98,
            },
        }
    }

    pub fn summary(self) -> String {
        let profile = self.profile();
        let (lo, hi) = profile.service_rate_bounds();
        format!(
            "{} band: value-add x{:.2}, repairs x{:.2}, carry x{:.2}, service rate {:.1}%-{:.1}%, partnership floor {:.0}% of anchor",
            self.label(),
            profile.rvi,
            profile.repairs,
            profile.carry,
            lo * 100.0,
            hi * 100.0,
            profile.prox * 100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::offer::domain::Selection;

    #[test]
    fn proximity_tightens_toward_stretch() {
        let proximities: Vec<f64> = ScenarioBand::ordered()
            .iter()
            .map(|band| band.profile().prox)
            .collect();
        assert_eq!(proximities, vec![0.95, 0.97, 0.98]);
    }

    #[test]
    fn upper_service_bound_never_drops_below_ceiling_floor() {
        for band in ScenarioBand::ordered() {
            let (lo, hi) = band.profile().service_rate_bounds();
            assert_eq!(lo, band.profile().svc_clamp.0);
            assert_eq!(hi, SERVICE_RATE_CEILING_FLOOR);
        }
    }

    #[test]
    fn likely_band_is_identity() {
        let profile = ScenarioBand::Likely.profile();
        assert_eq!(
            (profile.rvi, profile.repairs, profile.carry, profile.cash, profile.svc),
            (1.0, 1.0, 1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn summary_names_band_and_floor() {
        let summary = ScenarioBand::Conservative.summary();
        assert!(summary.starts_with("Conservative band"));
        assert!(summary.contains("service rate 3.0%-9.0%"));
        assert!(summary.contains("95% of anchor"));
    }
}
