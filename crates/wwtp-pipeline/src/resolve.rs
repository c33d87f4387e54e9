//! Candidate identity resolution.

use std::collections::HashSet;

use wwtp_core::{Candidate, SearchHit};

/// Collapses search hits into candidates unique by `provider_id`.
///
/// The first hit seen for an ID wins and fixes that candidate's position.
/// Later hits with the same ID are dropped even if their name differs, since
/// the name reflects which keyword matched rather than the facility.
#[must_use]
pub fn resolve_candidates<I>(hits: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = SearchHit>,
{
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.provider_id.clone()))
        .map(Candidate::from)
        .collect()
}
