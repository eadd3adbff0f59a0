use serde::Serialize;

/// Fixed per-dimension weights, stored in basis points (1/10_000) so the
/// weighted sum can be rounded exactly in integer arithmetic.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DimensionWeights {
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
    pub location: u32,
    pub other: u32,
}

pub const BASIS_POINTS: u32 = 10_000;

/// 40 / 25 / 20 / 10 / 5.
pub const MATCH_WEIGHTS: DimensionWeights = DimensionWeights {
    skills: 4_000,
    experience: 2_500,
    education: 2_000,
    location: 1_000,
    other: 500,
};

impl DimensionWeights {
    #[cfg(test)]
    pub fn sum(&self) -> u32 {
        self.skills + self.experience + self.education + self.location + self.other
    }

    #[cfg(test)]
    pub fn as_fraction(basis_points: u32) -> f64 {
        basis_points as f64 / BASIS_POINTS as f64
    }

    /// round(Σ weight × score) with half-up rounding, clamped to [0,100].
    /// Every input score is expected to already be clamped to [0,100].
    pub fn weighted_score(&self, scores: &DimensionScores) -> u32 {
        let total = self.skills * scores.skills
            + self.experience * scores.experience
            + self.education * scores.education
            + self.location * scores.location
            + self.other * scores.other;
        ((total + BASIS_POINTS / 2) / BASIS_POINTS).min(100)
    }
}

/// Integer dimension scores, each in [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionScores {
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
    pub location: u32,
    pub other: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(skills: u32, experience: u32, education: u32, location: u32, other: u32) -> DimensionScores {
        DimensionScores {
            skills,
            experience,
            education,
            location,
            other,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert_eq!(MATCH_WEIGHTS.sum(), BASIS_POINTS);
        let fractions = [
            MATCH_WEIGHTS.skills,
            MATCH_WEIGHTS.experience,
            MATCH_WEIGHTS.education,
            MATCH_WEIGHTS.location,
            MATCH_WEIGHTS.other,
        ]
        .iter()
        .map(|bp| DimensionWeights::as_fraction(*bp))
        .sum::<f64>();
        assert!((fractions - 1.0).abs() < 1e-9);
    }

    #[test]
    fn documented_fractions() {
        assert_eq!(DimensionWeights::as_fraction(MATCH_WEIGHTS.skills), 0.40);
        assert_eq!(DimensionWeights::as_fraction(MATCH_WEIGHTS.experience), 0.25);
        assert_eq!(DimensionWeights::as_fraction(MATCH_WEIGHTS.education), 0.20);
        assert_eq!(DimensionWeights::as_fraction(MATCH_WEIGHTS.location), 0.10);
        assert_eq!(DimensionWeights::as_fraction(MATCH_WEIGHTS.other), 0.05);
    }

    #[test]
    fn weighted_score_rounds_half_up() {
        // 26.8 + 16.75 + 20 + 10 + 5 = 78.55
        assert_eq!(MATCH_WEIGHTS.weighted_score(&scores(67, 67, 100, 100, 100)), 79);
    }

    #[test]
    fn weighted_score_extremes() {
        assert_eq!(MATCH_WEIGHTS.weighted_score(&scores(100, 100, 100, 100, 100)), 100);
        assert_eq!(MATCH_WEIGHTS.weighted_score(&scores(0, 0, 0, 0, 0)), 0);
    }
}
