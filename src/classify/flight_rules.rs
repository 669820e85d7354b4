use crate::classify::ClassificationPolicy;
use crate::types::flight_category::FlightRules;

const VFR_MIN_CEILING_FT: i64 = 2500;
const MVFR_MIN_CEILING_FT: i64 = 1000;
const IFR_MIN_CEILING_FT: i64 = 400;

const VFR_MIN_VISIBILITY_MI: f64 = 6.0;
const MVFR_MIN_VISIBILITY_MI: f64 = 3.0;
const MVFR_MAX_VISIBILITY_MI: f64 = 5.0;
const IFR_MIN_VISIBILITY_MI: f64 = 1.0;
const IFR_MAX_VISIBILITY_MI: f64 = 3.0;

/// Assigns the four flight-category flags from a ceiling and a visibility.
///
/// Every category is tested on its own, so several flags may be set at once.
/// A missing (or NaN) visibility sets no flag at all.
///
/// | Category | Baseline | Refined |
/// |---|---|---|
/// | VFR  | c ≥ 2500 ∧ v ≥ 6 | same |
/// | MVFR | 1000 ≤ c < 2500 ∨ 3 ≤ v ≤ 5 | (1000 ≤ c < 2500 ∧ v ≥ 3) ∨ (c ≥ 2500 ∧ 3 ≤ v ≤ 5) |
/// | IFR  | 400 ≤ c < 1000 ∨ 1 ≤ v ≤ 3 | (400 ≤ c < 1000 ∧ v ≥ 1) ∨ (c ≥ 1000 ∧ 1 ≤ v < 3) |
/// | LIFR | c < 400 ∨ v < 1 | same |
///
/// # Examples
///
/// ```rust
/// use station_climo::{classify, ClassificationPolicy, FlightRules, NO_CEILING_FT};
///
/// let rules = classify(NO_CEILING_FT, Some(10.0), ClassificationPolicy::Baseline);
/// assert_eq!(rules, FlightRules { vfr: true, mvfr: false, ifr: false, lifr: false });
///
/// let rules = classify(NO_CEILING_FT, Some(0.5), ClassificationPolicy::Baseline);
/// assert!(rules.lifr && !rules.vfr);
///
/// assert_eq!(classify(300, None, ClassificationPolicy::Baseline), FlightRules::default());
/// ```
pub fn classify(
    ceiling_ft: i64,
    visibility_mi: Option<f64>,
    policy: ClassificationPolicy,
) -> FlightRules {
    let Some(vis) = visibility_mi.filter(|v| !v.is_nan()) else {
        return FlightRules::default();
    };
    let ceiling = ceiling_ft;

    let ceiling_vfr = ceiling >= VFR_MIN_CEILING_FT;
    let ceiling_mvfr = (MVFR_MIN_CEILING_FT..VFR_MIN_CEILING_FT).contains(&ceiling);
    let ceiling_ifr = (IFR_MIN_CEILING_FT..MVFR_MIN_CEILING_FT).contains(&ceiling);
    let vis_mvfr_band = (MVFR_MIN_VISIBILITY_MI..=MVFR_MAX_VISIBILITY_MI).contains(&vis);

    let vfr = ceiling_vfr && vis >= VFR_MIN_VISIBILITY_MI;
    let lifr = ceiling < IFR_MIN_CEILING_FT || vis < IFR_MIN_VISIBILITY_MI;

    let (mvfr, ifr) = match policy {
        ClassificationPolicy::Baseline => (
            ceiling_mvfr || vis_mvfr_band,
            ceiling_ifr || (IFR_MIN_VISIBILITY_MI..=IFR_MAX_VISIBILITY_MI).contains(&vis),
        ),
        ClassificationPolicy::Refined => (
            (ceiling_mvfr && vis >= MVFR_MIN_VISIBILITY_MI) || (ceiling_vfr && vis_mvfr_band),
            (ceiling_ifr && vis >= IFR_MIN_VISIBILITY_MI)
                || (ceiling >= MVFR_MIN_CEILING_FT
                    && (IFR_MIN_VISIBILITY_MI..IFR_MAX_VISIBILITY_MI).contains(&vis)),
        ),
    };

    FlightRules {
        vfr,
        mvfr,
        ifr,
        lifr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ceiling::NO_CEILING_FT;
    use crate::types::flight_category::FlightCategory;

    const BASE: ClassificationPolicy = ClassificationPolicy::Baseline;
    const REFINED: ClassificationPolicy = ClassificationPolicy::Refined;

    fn rules(vfr: bool, mvfr: bool, ifr: bool, lifr: bool) -> FlightRules {
        FlightRules {
            vfr,
            mvfr,
            ifr,
            lifr,
        }
    }

    #[test]
    fn test_literal_scenarios() {
        for policy in [BASE, REFINED] {
            assert_eq!(
                classify(NO_CEILING_FT, Some(10.0), policy),
                rules(true, false, false, false)
            );
            assert!(classify(2000, Some(4.0), policy).mvfr);
            assert!(classify(600, Some(2.0), policy).ifr);
            assert!(classify(300, Some(10.0), policy).lifr);

            let low_vis = classify(NO_CEILING_FT, Some(0.5), policy);
            assert!(low_vis.lifr);
            assert!(!low_vis.vfr);
        }
    }

    #[test]
    fn test_vfr_boundary() {
        assert!(classify(2500, Some(6.0), BASE).vfr);
        assert!(!classify(2499, Some(6.0), BASE).vfr);
        assert!(!classify(2500, Some(5.99), BASE).vfr);
    }

    #[test]
    fn test_ceiling_sweep_with_good_visibility() {
        let vis = Some(10.0);
        let expect = [
            (300, FlightCategory::Lifr),
            (399, FlightCategory::Lifr),
            (400, FlightCategory::Ifr),
            (999, FlightCategory::Ifr),
            (1000, FlightCategory::Mvfr),
            (2499, FlightCategory::Mvfr),
            (2500, FlightCategory::Vfr),
            (2600, FlightCategory::Vfr),
        ];
        for policy in [BASE, REFINED] {
            for (ceiling, category) in expect {
                let result = classify(ceiling, vis, policy);
                assert_eq!(
                    result.worst_category(),
                    Some(category),
                    "ceiling {} under {:?}",
                    ceiling,
                    policy
                );
                // With unlimited-range visibility exactly one flag is set.
                let set = FlightCategory::ALL.iter().filter(|c| result.get(**c)).count();
                assert_eq!(set, 1, "ceiling {} under {:?}", ceiling, policy);
            }
        }
    }

    #[test]
    fn test_missing_visibility_sets_nothing() {
        for policy in [BASE, REFINED] {
            assert_eq!(classify(200, None, policy), FlightRules::default());
            assert_eq!(classify(NO_CEILING_FT, None, policy), FlightRules::default());
            assert_eq!(classify(1500, Some(f64::NAN), policy), FlightRules::default());
        }
    }

    #[test]
    fn test_baseline_overlapping_bands() {
        // Visibility 3 sits in both the MVFR and IFR bands.
        assert_eq!(classify(NO_CEILING_FT, Some(3.0), BASE), rules(false, true, true, false));
        // Ceiling-driven MVFR combined with visibility-driven IFR.
        assert_eq!(classify(1500, Some(2.0), BASE), rules(false, true, true, false));
        // Good ceiling, MVFR visibility.
        assert_eq!(classify(2500, Some(4.0), BASE), rules(false, true, false, false));
        // Visibility between 5 and 6 meets no visibility band.
        assert_eq!(classify(NO_CEILING_FT, Some(5.5), BASE), rules(false, false, false, false));
        // Low ceiling and low visibility together.
        assert_eq!(classify(300, Some(0.25), BASE), rules(false, false, false, true));
        // IFR ceiling with MVFR visibility.
        assert_eq!(classify(600, Some(4.0), BASE), rules(false, true, true, false));
    }

    #[test]
    fn test_refined_boundaries() {
        // IFR-band ceiling no longer counts as MVFR via visibility alone.
        assert_eq!(classify(600, Some(4.0), REFINED), rules(false, false, true, false));
        // Visibility 3 with good ceiling: MVFR only (IFR band is half-open at 3).
        assert_eq!(classify(NO_CEILING_FT, Some(3.0), REFINED), rules(false, true, false, false));
        // MVFR ceiling with visibility below 3 is IFR, not MVFR.
        assert_eq!(classify(1500, Some(2.0), REFINED), rules(false, false, true, false));
        // Good ceiling, visibility in [3, 5].
        assert_eq!(classify(2500, Some(4.0), REFINED), rules(false, true, false, false));
        assert_eq!(classify(2500, Some(5.0), REFINED), rules(false, true, false, false));
        // MVFR ceiling with unlimited visibility.
        assert_eq!(classify(1000, Some(10.0), REFINED), rules(false, true, false, false));
        // IFR ceiling with sub-mile visibility is LIFR only.
        assert_eq!(classify(500, Some(0.75), REFINED), rules(false, false, false, true));
        // IFR ceiling at exactly one mile.
        assert_eq!(classify(500, Some(1.0), REFINED), rules(false, false, true, false));
    }

    #[test]
    fn test_policies_disagree_at_edges() {
        let edges = [(600, 4.0), (1500, 2.0), (NO_CEILING_FT, 3.0)];
        for (ceiling, vis) in edges {
            assert_ne!(
                classify(ceiling, Some(vis), BASE),
                classify(ceiling, Some(vis), REFINED),
                "ceiling {} vis {}",
                ceiling,
                vis
            );
        }
    }
}
