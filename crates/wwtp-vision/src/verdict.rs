//! Parser for the tagged free-text answer the analysis prompt asks for.
//!
//! Total over its input: missing tags, unknown values, or a response with no
//! `[VERDICT]` marker at all degrade to [`Verdict::default`].

use wwtp_core::{Confidence, Decision, Verdict, WaterPresence};

const VERDICT: &str = "[VERDICT]";
const WATER_PRESENT: &str = "[WATER_PRESENT]";
const REASONING: &str = "[REASONING]";
const CONFIDENCE: &str = "[CONFIDENCE]";
const CAPACITY_ESTIMATE: &str = "[CAPACITY_ESTIMATE]";

pub(crate) const TAGS: [&str; 5] = [
    VERDICT,
    WATER_PRESENT,
    REASONING,
    CONFIDENCE,
    CAPACITY_ESTIMATE,
];

/// Raw tag contents, first occurrence only.
#[derive(Default)]
struct TaggedLines<'a> {
    verdict: Option<&'a str>,
    water_present: Option<&'a str>,
    reasoning: Option<&'a str>,
    confidence: Option<&'a str>,
    capacity_estimate: Option<&'a str>,
}

/// Parses a vision response into a [`Verdict`].
///
/// A line contributes to a field when, after leading whitespace and markdown
/// emphasis (`*`), it starts with that field's tag. Tags are case-sensitive;
/// values are not. When a tag appears on several lines the first line wins,
/// even if its value is unrecognised. Values outside the expected vocabulary
/// fall back to the field default, and an empty capacity reads as `Unknown`.
#[must_use]
pub fn parse_verdict(text: &str) -> Verdict {
    if !text.contains(VERDICT) {
        return Verdict::default();
    }

    let mut tagged = TaggedLines::default();
    for line in text.lines() {
        let line = line.trim_start_matches(|c: char| c.is_whitespace() || c == '*');
        if let Some(rest) = line.strip_prefix(VERDICT) {
            tagged.verdict.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(WATER_PRESENT) {
            tagged.water_present.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(REASONING) {
            tagged.reasoning.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(CONFIDENCE) {
            tagged.confidence.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(CAPACITY_ESTIMATE) {
            tagged.capacity_estimate.get_or_insert(rest);
        }
    }

    let defaults = Verdict::default();
    Verdict {
        decision: tagged
            .verdict
            .and_then(|v| Decision::from_label(clean_label(v)))
            .unwrap_or(defaults.decision),
        water_present: tagged
            .water_present
            .and_then(|v| WaterPresence::from_label(clean_label(v)))
            .unwrap_or(defaults.water_present),
        reasoning: tagged
            .reasoning
            .map_or(defaults.reasoning, |v| clean_text(v).to_string()),
        confidence: tagged
            .confidence
            .and_then(|v| Confidence::from_label(clean_label(v)))
            .unwrap_or(defaults.confidence),
        capacity_estimate: tagged
            .capacity_estimate
            .map(clean_text)
            .filter(|v| !v.is_empty())
            .map_or(defaults.capacity_estimate, str::to_string),
    }
}

/// Trims whitespace, a separating colon, and markdown emphasis.
fn clean_text(raw: &str) -> &str {
    raw.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == ':')
        .trim_end_matches(|c: char| c.is_whitespace() || c == '*')
}

/// [`clean_text`] plus trailing sentence punctuation, for enum labels.
fn clean_label(raw: &str) -> &str {
    clean_text(raw).trim_end_matches(['.', '!']).trim_end()
}
