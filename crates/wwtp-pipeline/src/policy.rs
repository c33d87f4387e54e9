//! The verification gate applied to every parsed verdict.

use wwtp_core::{Confidence, Decision, Verdict, WaterPresence};

/// Accepts a verdict only when every condition holds: decision `YES` or
/// `MAYBE`, water present, and confidence `Medium` or `High`.
///
/// No partial credit: a plausible site with low-confidence water detection is
/// rejected.
#[must_use]
pub fn accepts(verdict: &Verdict) -> bool {
    matches!(verdict.decision, Decision::Yes | Decision::Maybe)
        && verdict.water_present == WaterPresence::Yes
        && matches!(verdict.confidence, Confidence::Medium | Confidence::High)
}

/// Display status for an accepted verdict, fixed at acceptance time.
#[must_use]
pub fn status_label(verdict: &Verdict) -> String {
    format!("Verified — Water Present ({})", verdict.confidence)
}
