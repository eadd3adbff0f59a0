//! Ordered categories used by the scorer: education levels, experience levels,
//! job types and the match-level bands reported alongside a result.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Highest completed education, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Phd,
}

impl EducationLevel {
    pub fn ordinal(self) -> u32 {
        match self {
            EducationLevel::HighSchool => 0,
            EducationLevel::Associate => 1,
            EducationLevel::Bachelor => 2,
            EducationLevel::Master => 3,
            EducationLevel::Phd => 4,
        }
    }

    /// Parses a stored or submitted education label. `diploma` is accepted as
    /// an alias of `associate`.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "high_school" | "highschool" => Some(EducationLevel::HighSchool),
            "associate" | "diploma" => Some(EducationLevel::Associate),
            "bachelor" => Some(EducationLevel::Bachelor),
            "master" => Some(EducationLevel::Master),
            "phd" | "doctorate" => Some(EducationLevel::Phd),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Seniority category a job posting may require instead of a year count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Executive,
}

/// Lower bound (inclusive, in years) at which a candidate reaches each level.
pub const EXPERIENCE_THRESHOLDS: [(f64, ExperienceLevel); 6] = [
    (0.0, ExperienceLevel::Entry),
    (1.0, ExperienceLevel::Junior),
    (3.0, ExperienceLevel::Mid),
    (5.0, ExperienceLevel::Senior),
    (8.0, ExperienceLevel::Lead),
    (10.0, ExperienceLevel::Executive),
];

impl ExperienceLevel {
    pub fn ordinal(self) -> u32 {
        match self {
            ExperienceLevel::Entry => 0,
            ExperienceLevel::Junior => 1,
            ExperienceLevel::Mid => 2,
            ExperienceLevel::Senior => 3,
            ExperienceLevel::Lead => 4,
            ExperienceLevel::Executive => 5,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "entry" => Some(ExperienceLevel::Entry),
            "junior" => Some(ExperienceLevel::Junior),
            "mid" | "middle" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            "lead" => Some(ExperienceLevel::Lead),
            "executive" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }

    /// Maps total years of experience onto a level via `EXPERIENCE_THRESHOLDS`.
    pub fn from_years(years: f64) -> Self {
        EXPERIENCE_THRESHOLDS
            .iter()
            .rev()
            .find(|(min_years, _)| years >= *min_years)
            .map(|(_, level)| *level)
            .unwrap_or(ExperienceLevel::Entry)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job type
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Contract,
    Freelance,
}

impl JobType {
    /// Unknown labels yield `None`; callers treat that as "no type stated".
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "full_time" | "fulltime" => Some(JobType::FullTime),
            "part_time" | "parttime" => Some(JobType::PartTime),
            "internship" | "intern" => Some(JobType::Internship),
            "contract" => Some(JobType::Contract),
            "freelance" => Some(JobType::Freelance),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Match level bands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl MatchLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchLevel::Excellent => "excellent",
            MatchLevel::VeryGood => "very_good",
            MatchLevel::Good => "good",
            MatchLevel::Fair => "fair",
            MatchLevel::Poor => "poor",
        }
    }

    pub fn from_score(overall_score: u32) -> Self {
        if overall_score >= 90 {
            MatchLevel::Excellent
        } else if overall_score >= 80 {
            MatchLevel::VeryGood
        } else if overall_score >= 70 {
            MatchLevel::Good
        } else if overall_score >= 60 {
            MatchLevel::Fair
        } else {
            MatchLevel::Poor
        }
    }
}

/// Lower-cases, trims and folds `-` and spaces to `_` so "Full-Time" and
/// "full time" parse the same way.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_order_matches_ordinals() {
        let order = [
            EducationLevel::HighSchool,
            EducationLevel::Associate,
            EducationLevel::Bachelor,
            EducationLevel::Master,
            EducationLevel::Phd,
        ];
        for (idx, level) in order.iter().enumerate() {
            assert_eq!(level.ordinal() as usize, idx);
        }
        assert!(EducationLevel::HighSchool < EducationLevel::Phd);
    }

    #[test]
    fn test_education_parse_aliases() {
        assert_eq!(EducationLevel::parse(" Bachelor "), Some(EducationLevel::Bachelor));
        assert_eq!(EducationLevel::parse("diploma"), Some(EducationLevel::Associate));
        assert_eq!(EducationLevel::parse("High School"), Some(EducationLevel::HighSchool));
        assert_eq!(EducationLevel::parse("kindergarten"), None);
    }

    #[test]
    fn test_experience_from_years_thresholds() {
        assert_eq!(ExperienceLevel::from_years(0.0), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(0.9), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(1.0), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(2.5), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(3.0), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::from_years(5.0), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(7.99), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(8.0), ExperienceLevel::Lead);
        assert_eq!(ExperienceLevel::from_years(25.0), ExperienceLevel::Executive);
    }

    #[test]
    fn test_experience_thresholds_ascending() {
        for pair in EXPERIENCE_THRESHOLDS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1.ordinal() < pair[1].1.ordinal());
        }
    }

    #[test]
    fn test_job_type_parse() {
        assert_eq!(JobType::parse("Full-Time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse("part time"), Some(JobType::PartTime));
        assert_eq!(JobType::parse("gig"), None);
    }

    #[test]
    fn test_match_level_bands() {
        assert_eq!(MatchLevel::from_score(100), MatchLevel::Excellent);
        assert_eq!(MatchLevel::from_score(90), MatchLevel::Excellent);
        assert_eq!(MatchLevel::from_score(89), MatchLevel::VeryGood);
        assert_eq!(MatchLevel::from_score(70), MatchLevel::Good);
        assert_eq!(MatchLevel::from_score(60), MatchLevel::Fair);
        assert_eq!(MatchLevel::from_score(59), MatchLevel::Poor);
    }
}
