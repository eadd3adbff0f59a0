//! Rule-based strengths / weaknesses / recommendations.
//!
//! Output depends only on the dimension scores and missing skills already in
//! a `MatchResult`, in fixed dimension order, so identical results always
//! produce identical text.

use crate::matching::weights::DimensionScores;

/// Dimensions scoring at or above this are reported as strengths.
pub const STRENGTH_THRESHOLD: u32 = 80;
/// Dimensions scoring below this are reported as weaknesses.
pub const WEAKNESS_THRESHOLD: u32 = 60;
/// Cap on skills listed in a single recommendation.
const MAX_LISTED_SKILLS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Skills,
    Experience,
    Education,
    Location,
    Other,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Skills,
        Dimension::Experience,
        Dimension::Education,
        Dimension::Location,
        Dimension::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Skills => "skills",
            Dimension::Experience => "experience",
            Dimension::Education => "education",
            Dimension::Location => "location",
            Dimension::Other => "job type and salary",
        }
    }

    fn score_in(self, scores: &DimensionScores) -> u32 {
        match self {
            Dimension::Skills => scores.skills,
            Dimension::Experience => scores.experience,
            Dimension::Education => scores.education,
            Dimension::Location => scores.location,
            Dimension::Other => scores.other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn build_narrative(scores: &DimensionScores, missing_skills: &[String]) -> Narrative {
    let mut narrative = Narrative::default();

    for dimension in Dimension::ALL {
        let score = dimension.score_in(scores);
        let name = dimension.name();

        if score >= STRENGTH_THRESHOLD {
            narrative
                .strengths
                .push(format!("Strong {name} match ({score}/100)."));
        } else if score < WEAKNESS_THRESHOLD {
            narrative
                .weaknesses
                .push(format!("Weak {name} match ({score}/100)."));
            narrative
                .recommendations
                .push(recommendation_for(dimension, missing_skills));
        }
    }

    narrative
}

fn recommendation_for(dimension: Dimension, missing_skills: &[String]) -> String {
    match dimension {
        Dimension::Skills if !missing_skills.is_empty() => {
            let listed: Vec<&str> = missing_skills
                .iter()
                .take(MAX_LISTED_SKILLS)
                .map(String::as_str)
                .collect();
            let remaining = missing_skills.len() - listed.len();
            if remaining > 0 {
                format!("Acquire skills: {} and {remaining} more.", listed.join(", "))
            } else {
                format!("Acquire skills: {}.", listed.join(", "))
            }
        }
        Dimension::Skills => "Deepen proficiency in the role's required skills.".to_string(),
        Dimension::Experience => {
            "Build more hands-on experience toward the role's seniority requirement.".to_string()
        }
        Dimension::Education => {
            "Consider further education or certifications to meet the required level.".to_string()
        }
        Dimension::Location => {
            "Consider relocating or looking for remote roles in this field.".to_string()
        }
        Dimension::Other => {
            "Revisit job type and salary expectations for roles like this one.".to_string()
        }
    }
}
