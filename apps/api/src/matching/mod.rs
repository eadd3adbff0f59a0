// Candidate ↔ job match scoring.
// The scorer is pure; caching, persistence and HTTP live around it.

pub mod batch;
pub mod cache;
pub mod handlers;
pub mod levels;
pub mod narrative;
pub mod profile;
pub mod scorer;
pub mod store;
pub mod weights;
