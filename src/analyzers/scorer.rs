/// Scoring helpers shared by the analyzers
///
/// Every confidence in the engine is a [0,1] scalar; these helpers keep the
/// arithmetic in bounds no matter what the heuristics feed them.

/// Scorer for combining and normalizing confidence values
pub struct Scorer;

impl Scorer {
    /// Clamp any score into the [0,1] contract
    pub fn clamp(score: f64) -> f64 {
        if score.is_nan() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }

    /// Combine two independent signal confidences
    ///
    /// Noisy-or: either signal alone sets a floor, agreement pushes higher,
    /// and the result never exceeds 1.0.
    pub fn combine(a: f64, b: f64) -> f64 {
        let a = Self::clamp(a);
        let b = Self::clamp(b);
        Self::clamp(1.0 - (1.0 - a) * (1.0 - b))
    }

    /// Ratio of hits to evaluated items; 0 when nothing was evaluated
    pub fn coverage(hits: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        Self::clamp(hits as f64 / total as f64)
    }

    /// Weighted mean over (score, weight) pairs; 0 when weights sum to 0
    pub fn weighted_mean(parts: &[(f64, f64)]) -> f64 {
        let total_weight: f64 = parts.iter().map(|(_, w)| w).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let sum: f64 = parts.iter().map(|(s, w)| Self::clamp(*s) * w).sum();
        Self::clamp(sum / total_weight)
    }

    /// Mean of a confidence sum over `count` items; 0 for empty input
    pub fn coverage_mean(sum: f64, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        Self::clamp(sum / count as f64)
    }

    /// Confidence that grows with evidence count and saturates at `cap`
    pub fn evidence_confidence(evidence: usize, saturation: usize, cap: f64) -> f64 {
        if saturation == 0 {
            return 0.0;
        }
        Self::clamp((evidence as f64 / saturation as f64).min(1.0) * cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp() {
        assert_eq!(Scorer::clamp(1.5), 1.0);
        assert_eq!(Scorer::clamp(-0.2), 0.0);
        assert_eq!(Scorer::clamp(f64::NAN), 0.0);
        assert_eq!(Scorer::clamp(0.42), 0.42);
    }

    #[test]
    fn test_combine_agreement_raises_confidence() {
        let single = Scorer::combine(0.6, 0.0);
        let both = Scorer::combine(0.6, 0.5);
        assert_eq!(single, 0.6);
        assert!(both > single);
        assert!(both <= 1.0);
    }

    #[test]
    fn test_coverage() {
        assert_eq!(Scorer::coverage(3, 4), 0.75);
        assert_eq!(Scorer::coverage(0, 0), 0.0);
        assert_eq!(Scorer::coverage(5, 5), 1.0);
    }

    #[test]
    fn test_weighted_mean() {
        let score = Scorer::weighted_mean(&[(1.0, 0.5), (0.0, 0.5)]);
        assert_eq!(score, 0.5);
        assert_eq!(Scorer::weighted_mean(&[]), 0.0);
    }

    #[test]
    fn test_evidence_confidence_saturates() {
        let low = Scorer::evidence_confidence(1, 5, 0.9);
        let high = Scorer::evidence_confidence(10, 5, 0.9);
        assert!(low < high);
        assert_eq!(high, 0.9);
    }

    proptest! {
        #[test]
        fn prop_combine_in_bounds(a in -10.0f64..10.0, b in -10.0f64..10.0) {
            let c = Scorer::combine(a, b);
            prop_assert!((0.0..=1.0).contains(&c));
        }

        #[test]
        fn prop_weighted_mean_in_bounds(
            scores in proptest::collection::vec((-5.0f64..5.0, 0.0f64..3.0), 0..8)
        ) {
            let m = Scorer::weighted_mean(&scores);
            prop_assert!((0.0..=1.0).contains(&m));
        }
    }
}
