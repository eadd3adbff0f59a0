//! Match scoring: a pluggable, trait-based scorer that measures a candidate
//! profile against a job posting.
//!
//! Default: `RuleBasedScorer` (pure and deterministic).
//! `AppState` holds an `Arc<dyn MatchScorer>`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::levels::{ExperienceLevel, MatchLevel};
use crate::matching::narrative::build_narrative;
use crate::matching::profile::{
    normalize_key, CandidateProfile, ExperienceRequirement, JobPosting, Skill,
};
use crate::matching::weights::{DimensionScores, DimensionWeights, MATCH_WEIGHTS};

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Full match report returned to callers. Not persisted by the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: u32, // 0 – 100
    pub skill_score: u32,
    pub experience_score: u32,
    pub education_score: u32,
    pub location_score: u32,
    pub other_score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub bonus_skills: Vec<String>, // preferred skills the candidate has; never scored
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub match_level: MatchLevel,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
/// Scoring is CPU-only, so the trait is synchronous.
pub trait MatchScorer: Send + Sync {
    fn score(&self, candidate: &CandidateProfile, job: &JobPosting) -> MatchResult;

    /// Label reported in logs and cache keys.
    fn backend(&self) -> &'static str;
}

/// Fixed-weight rule scorer (skills 40, experience 25, education 20,
/// location 10, other 5).
pub struct RuleBasedScorer {
    weights: DimensionWeights,
}

impl Default for RuleBasedScorer {
    fn default() -> Self {
        Self {
            weights: MATCH_WEIGHTS,
        }
    }
}

impl MatchScorer for RuleBasedScorer {
    fn score(&self, candidate: &CandidateProfile, job: &JobPosting) -> MatchResult {
        compute_match(&self.weights, candidate, job)
    }

    fn backend(&self) -> &'static str {
        "rule_based"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_match(
    weights: &DimensionWeights,
    candidate: &CandidateProfile,
    job: &JobPosting,
) -> MatchResult {
    let skills = skill_overlap(&candidate.skills, &job.required_skills);
    let bonus_skills = skill_overlap(&candidate.skills, &job.preferred_skills).matched;

    let scores = DimensionScores {
        skills: to_score(skills.ratio * 100.0),
        experience: to_score(experience_score(candidate.experience_years, job.experience)),
        education: to_score(ordinal_score(
            candidate.education_level.ordinal(),
            job.education_level.ordinal(),
        )),
        location: to_score(location_score(candidate, job)),
        other: to_score(other_score(candidate, job)),
    };

    let overall_score = weights.weighted_score(&scores);
    let narrative = build_narrative(&scores, &skills.missing);

    debug!(
        job = job.title.as_deref().unwrap_or("-"),
        overall_score,
        skills = scores.skills,
        experience = scores.experience,
        education = scores.education,
        location = scores.location,
        other = scores.other,
        "scored match"
    );

    MatchResult {
        overall_score,
        skill_score: scores.skills,
        experience_score: scores.experience,
        education_score: scores.education,
        location_score: scores.location,
        other_score: scores.other,
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        bonus_skills,
        strengths: narrative.strengths,
        weaknesses: narrative.weaknesses,
        recommendations: narrative.recommendations,
        match_level: MatchLevel::from_score(overall_score),
    }
}

/// Rounds a raw sub-score and clamps it to [0,100].
fn to_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u32
}

struct SkillOverlap {
    ratio: f64,
    matched: Vec<String>,
    missing: Vec<String>,
}

/// Intersects the job's skills with the candidate's. Names are reported in
/// the job posting's spelling and order. An empty requirement set scores 1.0.
fn skill_overlap(candidate: &[Skill], required: &[Skill]) -> SkillOverlap {
    if required.is_empty() {
        return SkillOverlap {
            ratio: 1.0,
            matched: vec![],
            missing: vec![],
        };
    }

    let (matched, missing): (Vec<&Skill>, Vec<&Skill>) = required
        .iter()
        .partition(|req| candidate.iter().any(|c| c.key == req.key));

    SkillOverlap {
        ratio: matched.len() as f64 / required.len() as f64,
        matched: matched.into_iter().map(|s| s.display.clone()).collect(),
        missing: missing.into_iter().map(|s| s.display.clone()).collect(),
    }
}

fn experience_score(candidate_years: f64, requirement: ExperienceRequirement) -> f64 {
    match requirement {
        ExperienceRequirement::MinYears(required) => {
            if candidate_years >= required || required <= 0.0 {
                100.0
            } else {
                (100.0 * candidate_years / required).max(0.0)
            }
        }
        ExperienceRequirement::Level(required) => ordinal_score(
            ExperienceLevel::from_years(candidate_years).ordinal(),
            required.ordinal(),
        ),
    }
}

/// 100 when the candidate meets or exceeds the requirement, otherwise
/// proportional partial credit `(cand + 1) / (req + 1)`.
fn ordinal_score(candidate: u32, required: u32) -> f64 {
    if candidate >= required {
        100.0
    } else {
        100.0 * (candidate + 1) as f64 / (required + 1) as f64
    }
}

/// Binary: remote jobs and exact (case-insensitive) location matches score
/// 100, everything else 0.
fn location_score(candidate: &CandidateProfile, job: &JobPosting) -> f64 {
    if job.is_remote() {
        return 100.0;
    }
    match (&candidate.preferred_location, &job.location) {
        (Some(wanted), Some(offered)) if normalize_key(wanted) == normalize_key(offered) => 100.0,
        _ => 0.0,
    }
}

/// `(type_match ? 100 : 50) * (salary_overlap_or_absent ? 1.0 : 0.5)`.
fn other_score(candidate: &CandidateProfile, job: &JobPosting) -> f64 {
    let type_match = matches!(
        (candidate.preferred_job_type, job.job_type),
        (Some(wanted), Some(offered)) if wanted == offered
    );
    let salary_ok = match (&candidate.salary, &job.salary) {
        (Some(wanted), Some(offered)) => wanted.overlaps(offered),
        _ => true,
    };

    let base = if type_match { 100.0 } else { 50.0 };
    let factor = if salary_ok { 1.0 } else { 0.5 };
    base * factor
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::profile::fixtures::{candidate_input, job_input};
    use crate::matching::profile::{CandidateInput, InvalidInputError, JobInput};

    fn score(candidate: &CandidateProfile, job: &JobPosting) -> MatchResult {
        compute_match(&MATCH_WEIGHTS, candidate, job)
    }

    /// Validates both payloads, then scores them.
    fn score_inputs(
        candidate: &CandidateInput,
        job: &JobInput,
    ) -> Result<MatchResult, InvalidInputError> {
        let candidate = CandidateProfile::try_from(candidate)?;
        let job = JobPosting::try_from(job)?;
        Ok(score(&candidate, &job))
    }

    fn score_of(candidate: CandidateInput, job: JobInput) -> MatchResult {
        score_inputs(&candidate, &job).unwrap()
    }

    fn skills(names: &[&str]) -> Option<Vec<String>> {
        Some(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_reference_scenario_scores_79() {
        let result = score_of(candidate_input(), job_input());
        assert_eq!(result.skill_score, 67);
        assert_eq!(result.experience_score, 67);
        assert_eq!(result.education_score, 100);
        assert_eq!(result.location_score, 100);
        assert_eq!(result.other_score, 100);
        assert_eq!(result.overall_score, 79);
        assert_eq!(result.matched_skills, vec!["Python", "SQL"]);
        assert_eq!(result.missing_skills, vec!["React"]);
        assert_eq!(result.match_level, MatchLevel::Good);
    }

    #[test]
    fn test_superset_of_required_skills_scores_full() {
        let candidate = CandidateInput {
            skills: skills(&["python", "sql", "react", "docker"]),
            ..candidate_input()
        };
        let result = score_of(candidate, job_input());
        assert_eq!(result.skill_score, 100);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_empty_requirements_score_full_regardless_of_candidate() {
        let job = JobInput {
            required_skills: Some(vec![]),
            ..job_input()
        };
        let candidate = CandidateInput {
            skills: Some(vec![]),
            ..candidate_input()
        };
        let result = score_of(candidate, job);
        assert_eq!(result.skill_score, 100);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_empty_candidate_skills_against_requirements() {
        let candidate = CandidateInput {
            skills: Some(vec![]),
            ..candidate_input()
        };
        let result = score_of(candidate, job_input());
        assert_eq!(result.skill_score, 0);
        assert!(result.matched_skills.is_empty());
        assert_eq!(result.missing_skills, vec!["Python", "SQL", "React"]);
    }

    #[test]
    fn test_skill_comparison_ignores_case_and_whitespace() {
        let candidate = CandidateInput {
            skills: skills(&["  PYTHON ", "sql", "react"]),
            ..candidate_input()
        };
        let result = score_of(candidate, job_input());
        assert_eq!(result.skill_score, 100);
        assert_eq!(result.matched_skills, vec!["Python", "SQL", "React"]);
    }

    #[test]
    fn test_remote_job_always_scores_location_100() {
        for preferred in [Some("Tokyo"), Some("remote"), None] {
            let candidate = CandidateInput {
                preferred_location: preferred.map(str::to_string),
                ..candidate_input()
            };
            let job = JobInput {
                location: Some("Remote".to_string()),
                ..job_input()
            };
            assert_eq!(score_of(candidate, job).location_score, 100);
        }
    }

    #[test]
    fn test_location_mismatch_scores_zero() {
        let job = JobInput {
            location: Some("Munich".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate_input(), job).location_score, 0);
    }

    #[test]
    fn test_experience_meets_min_years() {
        let candidate = CandidateInput {
            experience_years: Some(3.0),
            ..candidate_input()
        };
        assert_eq!(score_of(candidate, job_input()).experience_score, 100);
    }

    #[test]
    fn test_experience_zero_required_years() {
        let candidate = CandidateInput {
            experience_years: Some(0.0),
            ..candidate_input()
        };
        let job = JobInput {
            min_experience_years: Some(0.0),
            ..job_input()
        };
        assert_eq!(score_of(candidate, job).experience_score, 100);
    }

    #[test]
    fn test_experience_level_partial_credit() {
        // 2 years → junior (1); senior (3) required → 100 * 2 / 4 = 50
        let job = JobInput {
            min_experience_years: None,
            experience_level: Some("senior".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate_input(), job).experience_score, 50);
    }

    #[test]
    fn test_experience_level_met() {
        let candidate = CandidateInput {
            experience_years: Some(9.0),
            ..candidate_input()
        };
        let job = JobInput {
            min_experience_years: None,
            experience_level: Some("lead".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate, job).experience_score, 100);
    }

    #[test]
    fn test_education_partial_credit() {
        // bachelor (2) vs phd (4) → 100 * 3 / 5 = 60
        let job = JobInput {
            education_level: Some("phd".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate_input(), job).education_score, 60);

        // high_school (0) vs master (3) → 100 * 1 / 4 = 25
        let candidate = CandidateInput {
            education_level: Some("high_school".to_string()),
            ..candidate_input()
        };
        let job = JobInput {
            education_level: Some("master".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate, job).education_score, 25);
    }

    #[test]
    fn test_other_score_formula() {
        let type_mismatch = JobInput {
            job_type: Some("contract".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate_input(), type_mismatch).other_score, 50);

        let wants_more = CandidateInput {
            salary_min: Some(100_000.0),
            salary_max: Some(120_000.0),
            ..candidate_input()
        };
        let pays_less = JobInput {
            salary_min: Some(50_000.0),
            salary_max: Some(70_000.0),
            ..job_input()
        };
        assert_eq!(score_of(wants_more.clone(), pays_less.clone()).other_score, 50);

        let both_off = JobInput {
            job_type: Some("internship".to_string()),
            ..pays_less
        };
        assert_eq!(score_of(wants_more, both_off).other_score, 25);
    }

    #[test]
    fn test_salary_on_one_side_only_is_no_penalty() {
        let job = JobInput {
            salary_min: Some(10_000.0),
            salary_max: Some(20_000.0),
            ..job_input()
        };
        assert_eq!(score_of(candidate_input(), job).other_score, 100);
    }

    #[test]
    fn test_unknown_job_type_falls_back_to_mismatch() {
        let job = JobInput {
            job_type: Some("zero-hours".to_string()),
            ..job_input()
        };
        assert_eq!(score_of(candidate_input(), job).other_score, 50);
    }

    #[test]
    fn test_location_and_type_mismatch_lowers_overall() {
        let perfect_candidate = CandidateInput {
            skills: skills(&["python", "sql", "react"]),
            experience_years: Some(5.0),
            ..candidate_input()
        };
        let matching = score_of(perfect_candidate.clone(), job_input());
        let mismatched = score_of(
            perfect_candidate,
            JobInput {
                location: Some("Lisbon".to_string()),
                job_type: Some("part_time".to_string()),
                ..job_input()
            },
        );
        assert_eq!(matching.overall_score, 100);
        assert!(mismatched.overall_score < matching.overall_score);
    }

    #[test]
    fn test_overall_matches_documented_weighted_sum() {
        let result = score_of(candidate_input(), job_input());
        let expected = DimensionWeights::as_fraction(MATCH_WEIGHTS.skills) * result.skill_score as f64
            + DimensionWeights::as_fraction(MATCH_WEIGHTS.experience) * result.experience_score as f64
            + DimensionWeights::as_fraction(MATCH_WEIGHTS.education) * result.education_score as f64
            + DimensionWeights::as_fraction(MATCH_WEIGHTS.location) * result.location_score as f64
            + DimensionWeights::as_fraction(MATCH_WEIGHTS.other) * result.other_score as f64;
        assert!((result.overall_score as f64 - expected).abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn test_scores_bounded_for_assorted_inputs() {
        let years = [0.0, 0.5, 2.0, 7.0, 40.0];
        let levels = ["entry", "mid", "executive"];
        for y in years {
            for level in levels {
                let candidate = CandidateInput {
                    experience_years: Some(y),
                    ..candidate_input()
                };
                let job = JobInput {
                    min_experience_years: None,
                    experience_level: Some(level.to_string()),
                    ..job_input()
                };
                let r = score_of(candidate, job);
                for s in [
                    r.overall_score,
                    r.skill_score,
                    r.experience_score,
                    r.education_score,
                    r.location_score,
                    r.other_score,
                ] {
                    assert!(s <= 100);
                }
            }
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let first = score_of(candidate_input(), job_input());
        let second = score_of(candidate_input(), job_input());
        assert_eq!(first, second);
    }

    #[test]
    fn test_bonus_skills_reported_but_not_scored() {
        let job = JobInput {
            preferred_skills: skills(&["Docker", "Kubernetes"]),
            ..job_input()
        };
        let candidate = CandidateInput {
            skills: skills(&["python", "sql", "docker"]),
            ..candidate_input()
        };
        let with_bonus = score_of(candidate.clone(), job);
        let without = score_of(candidate, job_input());
        assert_eq!(with_bonus.bonus_skills, vec!["Docker"]);
        assert_eq!(with_bonus.overall_score, without.overall_score);
    }

    #[test]
    fn test_missing_required_field_fails() {
        let job = JobInput {
            education_level: None,
            ..job_input()
        };
        assert!(score_inputs(&candidate_input(), &job).is_err());
    }

    #[test]
    fn test_trait_backend_matches_free_function() {
        let candidate = CandidateProfile::try_from(&candidate_input()).unwrap();
        let job = JobPosting::try_from(&job_input()).unwrap();
        let scorer = RuleBasedScorer::default();
        assert_eq!(scorer.score(&candidate, &job), score(&candidate, &job));
        assert_eq!(scorer.backend(), "rule_based");
    }

    #[test]
    fn test_json_keys() {
        let result = score_of(candidate_input(), job_input());
        let value = serde_json::to_value(&result).unwrap();
        for key in [
            "overall_score",
            "skill_score",
            "experience_score",
            "education_score",
            "location_score",
            "other_score",
            "matched_skills",
            "missing_skills",
            "strengths",
            "weaknesses",
            "recommendations",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["overall_score"], 79);
        assert_eq!(value["match_level"], "good");
    }
}
