//! Batch ranking: one candidate against many jobs, or one job against many
//! candidates.
//!
//! Each pair is independent, so records are validated and scored on the rayon
//! pool. Ranking is stable: equal scores keep their input order.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::matching::profile::{
    CandidateInput, CandidateProfile, InvalidInputError, JobInput, JobPosting,
};
use crate::matching::scorer::{MatchResult, MatchScorer};

#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    /// Lowest overall score kept.
    pub min_score: u32,
    /// Maximum number of matches returned.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    /// Position of the job in the submitted list.
    pub index: usize,
    pub job_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedJob {
    pub index: usize,
    pub job_id: Option<Uuid>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedMatches {
    pub matches: Vec<RankedMatch>,
    pub rejected: Vec<RejectedJob>,
    pub scored: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    /// Position of the candidate in the submitted list.
    pub index: usize,
    pub candidate_id: Option<Uuid>,
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedCandidate {
    pub index: usize,
    pub candidate_id: Option<Uuid>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidates {
    pub matches: Vec<RankedCandidate>,
    pub rejected: Vec<RejectedCandidate>,
    pub scored: usize,
}

/// A candidate payload tagged with the stored profile id, when there is one.
#[derive(Debug, Clone)]
pub struct CandidateEntry {
    pub id: Option<Uuid>,
    pub input: CandidateInput,
}

/// A validated candidate with its position in the submitted list.
#[derive(Debug, Clone)]
pub struct IndexedCandidate {
    pub index: usize,
    pub id: Option<Uuid>,
    pub profile: CandidateProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate → jobs
// ────────────────────────────────────────────────────────────────────────────

/// Validates and scores every job payload. Jobs that fail validation are
/// reported in `rejected` rather than failing the batch.
pub fn rank_job_inputs(
    scorer: &dyn MatchScorer,
    candidate: &CandidateProfile,
    jobs: &[JobInput],
    options: RankOptions,
) -> RankedMatches {
    let outcomes: Vec<(usize, Result<JobPosting, InvalidInputError>)> = jobs
        .par_iter()
        .enumerate()
        .map(|(index, input)| (index, JobPosting::try_from(input)))
        .collect();

    let mut postings = Vec::with_capacity(outcomes.len());
    let mut rejected = Vec::new();
    for (index, outcome) in outcomes {
        match outcome {
            Ok(job) => postings.push((index, job)),
            Err(e) => {
                warn!("Skipping job #{index} in batch: {e}");
                rejected.push(RejectedJob {
                    index,
                    job_id: jobs[index].id,
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut ranked = rank_postings(scorer, candidate, &postings, options);
    ranked.rejected = rejected;
    ranked
}

/// Scores already-validated postings, each tagged with its original index.
pub fn rank_postings(
    scorer: &dyn MatchScorer,
    candidate: &CandidateProfile,
    postings: &[(usize, JobPosting)],
    options: RankOptions,
) -> RankedMatches {
    let mut matches: Vec<RankedMatch> = postings
        .par_iter()
        .map(|(index, job)| RankedMatch {
            index: *index,
            job_id: job.id,
            job_title: job.title.clone(),
            result: scorer.score(candidate, job),
        })
        .filter(|m| m.result.overall_score >= options.min_score)
        .collect();

    order_and_truncate(&mut matches, |m| (m.result.overall_score, m.index), options.limit);

    info!(
        "Batch scored {} jobs ({} backend), {} at or above {}",
        postings.len(),
        scorer.backend(),
        matches.len(),
        options.min_score
    );

    RankedMatches {
        matches,
        rejected: vec![],
        scored: postings.len(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job → candidates
// ────────────────────────────────────────────────────────────────────────────

/// Validates and scores every candidate against one job. Candidates that
/// fail validation are reported in `rejected`.
pub fn rank_candidate_inputs(
    scorer: &dyn MatchScorer,
    job: &JobPosting,
    candidates: &[CandidateEntry],
    options: RankOptions,
) -> RankedCandidates {
    let outcomes: Vec<(usize, Result<CandidateProfile, InvalidInputError>)> = candidates
        .par_iter()
        .enumerate()
        .map(|(index, entry)| (index, CandidateProfile::try_from(&entry.input)))
        .collect();

    let mut profiles = Vec::with_capacity(outcomes.len());
    let mut rejected = Vec::new();
    for (index, outcome) in outcomes {
        let id = candidates[index].id;
        match outcome {
            Ok(profile) => profiles.push(IndexedCandidate { index, id, profile }),
            Err(e) => {
                warn!("Skipping candidate #{index} in batch: {e}");
                rejected.push(RejectedCandidate {
                    index,
                    candidate_id: id,
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut ranked = rank_candidates(scorer, job, &profiles, options);
    ranked.rejected = rejected;
    ranked
}

/// Scores already-validated candidates against one job.
pub fn rank_candidates(
    scorer: &dyn MatchScorer,
    job: &JobPosting,
    candidates: &[IndexedCandidate],
    options: RankOptions,
) -> RankedCandidates {
    let mut matches: Vec<RankedCandidate> = candidates
        .par_iter()
        .map(|c| RankedCandidate {
            index: c.index,
            candidate_id: c.id,
            result: scorer.score(&c.profile, job),
        })
        .filter(|m| m.result.overall_score >= options.min_score)
        .collect();

    order_and_truncate(&mut matches, |m| (m.result.overall_score, m.index), options.limit);

    info!(
        "Batch scored {} candidates for job {} ({} backend), {} at or above {}",
        candidates.len(),
        job.title.as_deref().unwrap_or("-"),
        scorer.backend(),
        matches.len(),
        options.min_score
    );

    RankedCandidates {
        matches,
        rejected: vec![],
        scored: candidates.len(),
    }
}

/// Best score first; ties broken by input position.
fn order_and_truncate<T>(matches: &mut Vec<T>, key: impl Fn(&T) -> (u32, usize), limit: Option<usize>) {
    matches.sort_by(|a, b| {
        let (score_a, index_a) = key(a);
        let (score_b, index_b) = key(b);
        score_b.cmp(&score_a).then(index_a.cmp(&index_b))
    });
    if let Some(limit) = limit {
        matches.truncate(limit);
    }
}
